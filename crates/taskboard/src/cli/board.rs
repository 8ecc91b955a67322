//! Board command handlers

use serde::Serialize;

use taskboard_core::BoardSnapshot;
use taskboard_core::BoardSession;

use crate::cli::util::{confirm, print_json, report_error};
use crate::cli::{CliBoardStore, block_on};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CustomerRow<'a> {
    customer_id: &'a str,
    path: &'a str,
    revision: &'a str,
}

/// Handle the list command
pub fn handle_list(store: &CliBoardStore, json: bool) -> bool {
    let customers = match block_on(store.list_customers()) {
        Ok(customers) => customers,
        Err(e) => {
            report_error(&e, json);
            return false;
        }
    };

    if json {
        let rows: Vec<CustomerRow> = customers
            .iter()
            .map(|c| CustomerRow {
                customer_id: &c.customer_id,
                path: &c.path,
                revision: &c.revision,
            })
            .collect();
        return print_json(&rows);
    }

    if customers.is_empty() {
        println!("No boards found.");
    }
    for customer in &customers {
        println!("{}", customer.customer_id);
    }
    true
}

/// Handle the show command
pub fn handle_show(
    store: &CliBoardStore,
    customer: &str,
    password_hash: Option<&str>,
    json: bool,
) -> bool {
    let result = match password_hash {
        Some(hash) => block_on(store.load(customer, hash)),
        None => block_on(store.load_admin(customer)),
    };
    let board = match result {
        Ok(board) => board,
        Err(e) => {
            report_error(&e, json);
            return false;
        }
    };

    if json {
        return print_json(&board);
    }

    print_board(customer, &board);
    true
}

fn print_board(customer: &str, board: &BoardSnapshot) {
    println!("{} ({})", board.title(customer), board.version);
    if let Some(revision) = &board.revision {
        println!("Revision: {}", revision);
    }
    if let Some(end) = &board.uat_end_date {
        println!("UAT ends: {}", end);
    }
    for column in board.columns.iter() {
        println!();
        println!("{} ({})", column.title, column.items.len());
        for task in &column.items {
            let lock = if task.is_locked() { " [locked]" } else { "" };
            println!("  #{} {}{}", task.id, task.description, lock);
        }
    }
}

/// Handle the create command
pub fn handle_create(
    store: &CliBoardStore,
    customer: &str,
    password_hash: &str,
    display_name: Option<String>,
    json: bool,
) -> bool {
    let snapshot = BoardSnapshot {
        display_name,
        ..BoardSnapshot::new(password_hash)
    };
    let message = format!("Create customer: {}", customer);

    match block_on(BoardSession::create(store, customer, snapshot, &message)) {
        Ok(session) => {
            let baseline = session.into_baseline();
            if json {
                return print_json(&serde_json::json!({
                    "customerId": customer,
                    "version": baseline.version,
                    "revision": baseline.revision,
                }));
            }
            println!("✓ Created board for '{}' ({})", customer, baseline.version);
            true
        }
        Err(e) => {
            report_error(&e, json);
            false
        }
    }
}

/// Handle the delete command
pub fn handle_delete(store: &CliBoardStore, customer: &str, yes: bool, json: bool) -> bool {
    if !yes && !confirm(&format!("Delete the board for '{}'?", customer)) {
        println!("Cancelled.");
        return true;
    }

    match block_on(store.delete(customer)) {
        Ok(()) => {
            if json {
                return print_json(&serde_json::json!({ "deleted": customer }));
            }
            println!("✓ Deleted board for '{}'", customer);
            true
        }
        Err(e) => {
            report_error(&e, json);
            false
        }
    }
}
