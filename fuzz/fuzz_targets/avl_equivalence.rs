#![no_main]
use libfuzzer_sys::fuzz_target;

use algotask::model::{run_avl_equivalence, ScriptOp};

fuzz_target!(|ops: Vec<ScriptOp>| { run_avl_equivalence(ops) });
