#![no_main]
use libfuzzer_sys::fuzz_target;

use algotask::model::{run_bst_equivalence, ScriptOp};

fuzz_target!(|ops: Vec<ScriptOp>| { run_bst_equivalence(ops) });
