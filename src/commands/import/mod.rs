use std::collections::HashMap;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rusqlite::{Connection, OpenFlags, Transaction, params_from_iter};
use tracing::{debug, info, warn};

use crate::model::{Diagnostic, ImportCounts};
use crate::token::{TOKEN_LEN, is_valid_token};

/// SQLite refuses statements with more host parameters than this.
const MAX_BATCH_SIZE: usize = 32766;

mod batch;
mod collector;
mod error;
mod pipeline;
mod run;
mod store;

pub use run::run;

use batch::*;
use collector::*;
use error::*;
use pipeline::*;
use store::*;
