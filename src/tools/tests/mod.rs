//! Tests for the workspace toolbox.

mod toolbox_tests;
