#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod enumerate;
pub mod interrupt;
pub mod operations;
pub mod output;
pub mod prompt;
pub mod rename;
pub mod resolver;

pub use config::{Config, RetryPolicy};
pub use enumerate::{enumerate_candidates, CandidateFile, EnumerateOptions, SELF_NAMES};
pub use interrupt::{Interrupt, PromptGuard};
pub use operations::{run_operation, RunOptions};
pub use output::{
    FileOutcome, FileReport, OutputFormat, OutputFormatter, RunResult, VersionResult,
};
pub use prompt::{decide, Decision, LineSource};
pub use rename::{rename_file, RenameDecision, RenameOutcome};
pub use resolver::{
    parse_query_response, CandidateName, HttpNamingService, NameQuery, NameQueryResult,
    NamingService, ResolveError, ResolverOptions, QUERY_PATH,
};
