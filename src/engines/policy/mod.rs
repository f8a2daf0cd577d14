// Policy stage: declarative rules over the scored outcome

pub mod policy_engine;
pub mod policy_loader;
pub mod policy_types;

pub use policy_engine::evaluate;
pub use policy_loader::load_policy;
pub use policy_types::{
    EnforcementMode, MatchConditions, PolicyAction, PolicyDocument, PolicyEvaluationResult,
    PolicyRule, RuleHit,
};
