//! Local enrollment state.

use anyhow::{Context, Result};
use rollcall_enroll::{current_user, read_record};
use serde_json::json;

use super::print_json;
use crate::store::FileStore;

/// Print the stored enrollment record and the current operator.
pub fn run(store: &FileStore, json: bool) -> Result<()> {
    let record = read_record(store).context("Failed to read enrollment record")?;
    let user = current_user(store);

    if json {
        return print_json(&json!({
            "store": store.path().display().to_string(),
            "record": record,
            "user": user,
        }));
    }

    println!("Store: {}", store.path().display());
    match &record {
        Some(record) => {
            println!("Enrolled user: {}", record.user_id);
            println!("Enrolled: {}", if record.is_enrolled { "yes" } else { "no" });
        }
        None => println!("Enrolled user: none"),
    }
    match &user {
        Some(user) => println!("Operator: {}", user.id),
        None => println!("Operator: not signed in"),
    }

    Ok(())
}
