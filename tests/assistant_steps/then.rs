//! Then steps for assistant turn scenarios.

use super::world::{AssistantWorld, run_async};
use atelier::workflow::LoopTermination;
use atelier::workspace::domain::TaskFilter;
use atelier::workspace::ports::TaskProvider;
use rstest_bdd_macros::then;

#[then(r#"the assistant is in "{mode}" mode"#)]
fn assistant_in_mode(world: &mut AssistantWorld, mode: String) -> Result<(), eyre::Report> {
    let actual = world.agent()?.state().mode();
    eyre::ensure!(
        actual.as_str() == mode,
        "expected mode {mode}, found {actual}"
    );
    Ok(())
}

#[then("the manifest is less than complete")]
fn manifest_incomplete(world: &mut AssistantWorld) -> Result<(), eyre::Report> {
    let state = world.agent()?.state();
    eyre::ensure!(!state.missing_info().is_empty(), "expected missing fields");
    eyre::ensure!(
        state.manifest().completeness_score() < 100,
        "expected an incomplete manifest"
    );
    Ok(())
}

#[then(r#"the reply is "{content}""#)]
fn reply_is(world: &AssistantWorld, content: String) -> Result<(), eyre::Report> {
    let response = world.response()?;
    eyre::ensure!(
        response.content == content,
        "unexpected reply: {}",
        response.content
    );
    Ok(())
}

#[then("the turn ends at the step limit")]
fn turn_ends_at_limit(world: &AssistantWorld) -> Result<(), eyre::Report> {
    let response = world.response()?;
    eyre::ensure!(
        response.termination == LoopTermination::StepLimitReached,
        "expected the step limit, got {:?}",
        response.termination
    );
    Ok(())
}

#[then("the model was invoked once more than the step limit")]
fn invocations_match_limit(world: &AssistantWorld) -> Result<(), eyre::Report> {
    let expected = world.config.max_steps.saturating_add(1);
    let actual = world.model.invocation_count();
    eyre::ensure!(
        actual == expected,
        "expected {expected} invocations, got {actual}"
    );
    Ok(())
}

#[then(r#"the board holds {count:usize} tasks with priorities "{priorities}""#)]
fn board_holds_tasks(
    world: &AssistantWorld,
    count: usize,
    priorities: String,
) -> Result<(), eyre::Report> {
    world.response()?;
    let tasks = run_async(world.tasks.list(&TaskFilter::default()))
        .map_err(|err| eyre::eyre!("list tasks: {err}"))?;
    eyre::ensure!(tasks.len() == count, "expected {count} tasks, found {}", tasks.len());
    let actual: Vec<&str> = tasks.iter().map(|task| task.priority.as_str()).collect();
    eyre::ensure!(
        actual.join(", ") == priorities,
        "unexpected priorities: {actual:?}"
    );
    Ok(())
}
