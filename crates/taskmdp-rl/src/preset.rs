//! Built-in project-phase scheduling model
//!
//! Six phase states from planning to finishing, each with a typical
//! resources/schedule/budget/quality profile, and fifteen actions, three
//! per category. Actions that address a problem visible in the state pay
//! more and move the project forward more often; `continue_normal` is the
//! main driver of phase progression and pays out most in the final phase.

use taskmdp_core::{
    attributes, ActionCategory, ActionDescriptor, AttributeDomain, Attributes, StateRef,
};

use crate::engine::MdpDefinition;
use crate::reward::RewardSeed;
use crate::transition::{SuccessorSeed, TransitionSeed};

pub const PHASES: [&str; 6] = [
    "planning",
    "design",
    "development",
    "testing",
    "deployment",
    "finishing",
];

pub const CONTINUE_NORMAL: &str = "continue_normal";

const COMPLETION_REWARD: f64 = 100.0;
const PROGRESS_REWARD: f64 = 30.0;
const CORRECTIVE_REWARD: f64 = 40.0;
const ROUTINE_REWARD: f64 = 10.0;

const ADVANCE_ON_PROGRESS: f64 = 0.8;
const ADVANCE_ON_CORRECTION: f64 = 0.5;
const ADVANCE_ON_ROUTINE: f64 = 0.2;

pub fn domains() -> Vec<AttributeDomain> {
    vec![
        AttributeDomain::new("phase", PHASES),
        AttributeDomain::new("resources", ["low", "adequate", "high"]),
        AttributeDomain::new("schedule", ["behind", "on_track", "ahead"]),
        AttributeDomain::new("budget", ["over", "on_budget", "under"]),
        AttributeDomain::new("quality", ["poor", "acceptable", "good"]),
    ]
}

/// Typical condition of a project in each phase, in phase order
pub fn phase_states() -> Vec<Attributes> {
    [
        ("planning", "adequate", "on_track", "on_budget", "acceptable"),
        ("design", "adequate", "on_track", "on_budget", "good"),
        ("development", "low", "behind", "on_budget", "acceptable"),
        ("testing", "adequate", "behind", "over", "poor"),
        ("deployment", "adequate", "on_track", "over", "good"),
        ("finishing", "adequate", "on_track", "on_budget", "good"),
    ]
    .into_iter()
    .map(|(phase, resources, schedule, budget, quality)| {
        attributes([
            ("phase", phase),
            ("resources", resources),
            ("schedule", schedule),
            ("budget", budget),
            ("quality", quality),
        ])
    })
    .collect()
}

pub fn actions() -> Vec<ActionDescriptor> {
    use taskmdp_core::ActionCategory::{Progress, Quality, Resource, Risk, Schedule};
    use taskmdp_core::CostTier as C;
    use taskmdp_core::DurationTier as D;

    [
        ("add_resources", Resource, C::High, D::Medium, "Bring additional people onto the project"),
        ("reallocate_resources", Resource, C::Medium, D::Short, "Move people between workstreams"),
        ("outsource_work", Resource, C::High, D::Long, "Hand a workstream to an external team"),
        ("quality_review", Quality, C::Medium, D::Short, "Run a structured review of deliverables"),
        ("add_testing", Quality, C::Medium, D::Medium, "Extend test coverage"),
        ("refactor", Quality, C::High, D::Long, "Rework problematic components"),
        ("fast_track", Schedule, C::Medium, D::Short, "Overlap dependent activities"),
        ("crash_schedule", Schedule, C::High, D::Short, "Add effort to critical-path tasks"),
        ("extend_deadline", Schedule, C::Low, D::Short, "Negotiate a later delivery date"),
        ("risk_assessment", Risk, C::Low, D::Short, "Reassess open risks"),
        ("mitigation_plan", Risk, C::Medium, D::Medium, "Plan responses to the top risks"),
        ("contingency_reserve", Risk, C::Medium, D::Short, "Set aside budget for overruns"),
        (CONTINUE_NORMAL, Progress, C::Low, D::Medium, "Proceed with the current plan"),
        ("milestone_review", Progress, C::Low, D::Short, "Check progress against milestones"),
        ("reduce_scope", Progress, C::Medium, D::Short, "Drop lower-priority features"),
    ]
    .into_iter()
    .map(|(id, category, cost, duration, description)| {
        ActionDescriptor::new(id, category)
            .with_cost(cost)
            .with_duration(duration)
            .with_description(description)
    })
    .collect()
}

fn has(state: &Attributes, attribute: &str, value: &str) -> bool {
    state.get(attribute).map(String::as_str) == Some(value)
}

/// Whether the action targets a problem the state exhibits
fn addresses_problem(state: &Attributes, action: &ActionDescriptor) -> bool {
    match action.category {
        ActionCategory::Resource => has(state, "resources", "low"),
        ActionCategory::Quality => has(state, "quality", "poor"),
        ActionCategory::Schedule => has(state, "schedule", "behind"),
        ActionCategory::Risk => has(state, "budget", "over"),
        ActionCategory::Progress => action.id == "reduce_scope" && has(state, "schedule", "behind"),
    }
}

fn base_reward(state: &Attributes, action: &ActionDescriptor, is_final: bool) -> f64 {
    if action.id == CONTINUE_NORMAL {
        if is_final {
            COMPLETION_REWARD
        } else {
            PROGRESS_REWARD
        }
    } else if addresses_problem(state, action) {
        CORRECTIVE_REWARD
    } else {
        ROUTINE_REWARD
    }
}

fn advance_probability(state: &Attributes, action: &ActionDescriptor) -> f64 {
    if action.id == CONTINUE_NORMAL {
        ADVANCE_ON_PROGRESS
    } else if addresses_problem(state, action) {
        ADVANCE_ON_CORRECTION
    } else {
        ADVANCE_ON_ROUTINE
    }
}

/// The complete project-management model.
///
/// Rewards are the base reward minus the action's cost. The finishing
/// phase has no seeded transitions, so every action self-loops there.
pub fn project_management() -> MdpDefinition {
    let states = phase_states();
    let actions = actions();
    let mut transitions = Vec::new();
    let mut rewards = Vec::new();

    for (i, state) in states.iter().enumerate() {
        let is_final = i + 1 == states.len();

        for action in &actions {
            rewards.push(RewardSeed {
                state: StateRef::from(state.clone()),
                action: action.id.clone(),
                reward: base_reward(state, action, is_final) - action.cost.cost(),
            });

            if let Some(next) = states.get(i + 1) {
                let advance = advance_probability(state, action);
                transitions.push(TransitionSeed {
                    state: StateRef::from(state.clone()),
                    action: action.id.clone(),
                    successors: vec![
                        SuccessorSeed {
                            state: StateRef::from(next.clone()),
                            probability: advance,
                        },
                        SuccessorSeed {
                            state: StateRef::from(state.clone()),
                            probability: 1.0 - advance,
                        },
                    ],
                });
            }
        }
    }

    MdpDefinition {
        domains: domains(),
        states: Some(states),
        actions,
        terminal: None,
        transitions,
        rewards,
    }
}
