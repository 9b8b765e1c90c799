/// Static message routing policy
///
/// A directed permission graph over roles: which sender may address which
/// receiver. The graph is consulted, never mutated, and is independent of
/// the execution order the orchestrator enforces.
use super::roles::Role;

/// Roles the given role is allowed to address.
///
/// Exhaustive over the closed `Role` enumeration, so adding a role without
/// a policy entry is a compile error.
pub fn reachable_from(role: Role) -> &'static [Role] {
    match role {
        Role::System => &[Role::Steward, Role::Transcriber, Role::Summarizer],
        Role::Steward => &[
            Role::Transcriber,
            Role::Summarizer,
            Role::DecisionExtractor,
            Role::ActionItemAgent,
        ],
        Role::Transcriber => &[Role::Steward, Role::Summarizer],
        Role::Summarizer => &[Role::Steward, Role::DecisionExtractor],
        Role::DecisionExtractor => &[Role::Steward, Role::ActionItemAgent],
        Role::ActionItemAgent => &[Role::Steward],
    }
}

/// Whether `from` may address `to`.
pub fn is_allowed(from: Role, to: Role) -> bool {
    reachable_from(from).contains(&to)
}

/// Label-level route check for callers at the boundary. Unknown labels are
/// a validation failure, expressed as `false`, never a panic.
pub fn route_allowed(from: &str, to: &str) -> bool {
    match (Role::parse(from), Role::parse(to)) {
        (Some(from), Some(to)) => is_allowed(from, to),
        _ => false,
    }
}

/// Labels of the roles reachable from the given label. Unknown labels yield
/// the empty set.
pub fn next_agents(from: &str) -> Vec<&'static str> {
    match Role::parse(from) {
        Some(role) => reachable_from(role).iter().map(Role::as_str).collect(),
        None => Vec::new(),
    }
}
