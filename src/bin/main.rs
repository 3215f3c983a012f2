use std::env;
use std::process;

use algotask::{AvlTask, BstTask, Operation, OperationTree, TreeError, TreeTask};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        let name = args.first().map(|s| s.as_str()).unwrap_or("algotask");
        eprintln!("Usage: {name} <bst|avl> <operations>");
        eprintln!();
        eprintln!("Operations are a comma separated list of values, each prefixed");
        eprintln!("with + (insert) or - (delete).");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {name} avl +10,+20,+30,-10");
        process::exit(2);
    }

    let parsed: Result<Vec<Operation>, _> = args[2].split(',').map(str::parse).collect();
    let operations = match parsed {
        Ok(operations) => operations,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(2);
        }
    };

    let result = match args[1].as_str() {
        "bst" => replay(BstTask::new(operations)),
        "avl" => replay(AvlTask::new(operations)),
        other => {
            eprintln!("Error: unknown task {other:?}");
            process::exit(2);
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// Prints one Graphviz graph per applied operation.
fn replay<T: OperationTree>(mut task: TreeTask<T>) -> Result<(), TreeError> {
    let mut step = 0u32;

    task.run(|snapshot| {
        println!("// step {step}: {}", snapshot.operation);

        let mut graph = String::new();
        snapshot
            .root
            .dotgraph(&step.to_string(), &mut graph)
            .expect("writing to a string cannot fail");
        println!("{graph}");

        step += 1;
    })
}
