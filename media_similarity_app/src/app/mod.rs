mod app_cfg;
mod app_fns;
mod arg_parse;
mod compare_output;
mod errors;

pub(crate) use app_cfg::*;
pub(crate) use errors::*;

use compare_output::CompareOutput;

pub use app_fns::run_app;
