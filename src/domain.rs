pub mod entities;
pub mod path_rules;
pub mod use_cases;
