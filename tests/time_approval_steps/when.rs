//! When steps for time approval BDD scenarios.

use super::world::{ApprovalWorld, run_async};
use rstest_bdd_macros::when;

#[when("the entry is approved")]
fn entry_is_approved(world: &mut ApprovalWorld) -> Result<(), eyre::Report> {
    let entry_id = world.entry()?.id().clone();
    let result = run_async(world.service.approve_time_entry(&entry_id));
    if let Ok(ref approved) = result {
        world.entry = Some(approved.clone());
    }
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the entry description is changed to "{description}""#)]
fn entry_description_changed(
    world: &mut ApprovalWorld,
    description: String,
) -> Result<(), eyre::Report> {
    let entry_id = world.entry()?.id().clone();
    let result = run_async(
        world
            .service
            .update_time_entry_description(&entry_id, Some(description)),
    );
    world.last_result = Some(result);
    Ok(())
}
