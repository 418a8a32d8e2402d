//! Plain-text rendering of command results.
//!
//! Tables are fixed-width, left-aligned except for amounts, and end with a
//! newline. `--json` output bypasses this module.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::fmt::Write as _;

use chamasys::SessionState;
use chamasys::ledger::{self, AdminSummary, MemberSummary};
use chamasys::models::{Contribution, User};

/// One-line description of the stored session.
pub fn whoami(state: &SessionState) -> String {
    match state {
        SessionState::Unauthenticated => "Not logged in.".to_owned(),
        SessionState::Authenticated(claims) => format!("Logged in as {} (member).", claims.display_name()),
        SessionState::AuthenticatedAdmin(claims) => format!("Logged in as {} (admin).", claims.display_name()),
    }
}

/// The caller's own ledger with its total.
pub fn member_ledger(contributions: &[Contribution]) -> String {
    if contributions.is_empty() {
        return "No Contributions Found\n".to_owned();
    }
    let summary = MemberSummary::of(contributions);
    let mut out = String::new();
    let _ = writeln!(out, "{:<20} {:>12}", "DATE", "AMOUNT");
    for row in ledger::member_rows(contributions) {
        let _ = writeln!(out, "{:<20} {:>12}", row.date, row.amount);
    }
    let _ = writeln!(
        out,
        "Total contributed: {} across {} contributions",
        ledger::format_amount(summary.total),
        summary.count
    );
    out
}

/// Member accounts with their role.
pub fn users(users: &[User]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<20} {:<30} {}", "ID", "USERNAME", "EMAIL", "ROLE");
    for user in users {
        let role = if user.is_admin { "admin" } else { "member" };
        let _ = writeln!(
            out,
            "{:>6}  {:<20} {:<30} {role}",
            user.id,
            user.username,
            user.email.as_deref().unwrap_or("-")
        );
    }
    out
}

/// Stat block plus the master ledger.
pub fn admin_ledger(users: &[User], contributions: &[Contribution]) -> String {
    let summary = AdminSummary::of(users, contributions);
    let mut out = String::new();
    let _ = writeln!(out, "Total Collected:    {}", ledger::format_amount(summary.total_collected));
    let _ = writeln!(out, "Total Members:      {}", summary.members);
    let _ = writeln!(out, "Total Transactions: {}", summary.transactions);
    out.push('\n');
    if contributions.is_empty() {
        out.push_str("The Ledger is Empty\n");
        return out;
    }
    let _ = writeln!(out, "{:>6}  {:<20} {:<12} {:>12}", "ID", "MEMBER", "DATE", "AMOUNT");
    for row in ledger::admin_rows(users, contributions) {
        let _ = writeln!(out, "{:>6}  {:<20} {:<12} {:>12}", row.id, row.member, row.date, row.amount);
    }
    out
}

/// Confirmation for a created or updated record.
pub fn saved(verb: &str, contribution: &Contribution) -> String {
    format!(
        "{verb} contribution #{}: {} on {} for member #{}",
        contribution.id,
        ledger::format_amount(contribution.amount),
        ledger::input_date(&contribution.date),
        contribution.user_id
    )
}
