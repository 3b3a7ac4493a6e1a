//! When steps for assistant turn scenarios.

use super::world::{AssistantWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"the user says "{input}""#)]
fn user_says(world: &mut AssistantWorld, input: String) -> Result<(), eyre::Report> {
    let agent = world.agent()?;
    let result = run_async(agent.handle_message(&input));
    world.last_response = Some(result);
    Ok(())
}
