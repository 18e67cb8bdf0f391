//! Interactive BB84 demo: menu-driven simulation runs rendered as
//! colored console output. All protocol logic lives in the library.

use bb84_sim::protocols::qkd::bb84::{self, EveRunResult, RunResult};
use bb84_sim::{Basis, BitFlipChannel, errors::ProtocolError};
use std::io::{self, Write};

const NUM_QUBITS: usize = 32;
const NUM_ITERATIONS: usize = 1;
const EVE_ERROR_RATE: f64 = 0.1;

const RESET: &str = "\x1b[0m";
const BLUE: &str = "\x1b[94m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const MAGENTA: &str = "\x1b[95m";

const BANNER: &str = r"
 ___  ___  ___  _ _
| . >| . >| . || | |
| . \| . \| . ||_  _|
|___/|___/`___'  |_|
";

fn bits_line(bits: &[bool]) -> String {
    bits.iter()
        .map(|&b| if b { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bases_line(bases: &[Basis]) -> String {
    bases
        .iter()
        .map(|b| match b {
            Basis::Rectilinear => "Z",
            Basis::Diagonal => "X",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_run(result: &RunResult) {
    println!("{BLUE}Alice's Bits:      {}{RESET}", bits_line(&result.alice_bits));
    println!("{BLUE}Alice's Basis:     {}{RESET}", bases_line(&result.alice_bases));
    println!("{GREEN}Bob's Basis:       {}{RESET}", bases_line(&result.bob_bases));
    println!("{GREEN}Bob's Measurement: {}{RESET}", bits_line(&result.bob_results));

    println!("{MAGENTA}Alice's Key: {}{RESET}", bits_line(&result.alice_key));
    println!("{MAGENTA}Bob's Key:   {}{RESET}", bits_line(&result.bob_key));

    let cmp = &result.comparison;
    if cmp.equal {
        println!("{GREEN}Keys are the same and secure.{RESET}\n");
    } else {
        println!(
            "{RED}Error: Keys differ in {} position(s) (QBER {:.1}%).{RESET}\n",
            cmp.mismatches,
            cmp.qber()
        );
    }
    println!(
        "{MAGENTA}Key Length: Alice = {}, Bob = {}{RESET}",
        cmp.len_a, cmp.len_b
    );
    println!("{}", "-".repeat(50));
}

fn print_eve_run(result: &EveRunResult) {
    println!("{RED}Eve's Basis:        {}{RESET}", bases_line(&result.eve_bases));
    println!("{RED}Eve's Measurements: {}{RESET}", bits_line(&result.eve_results));
    print_run(&result.run);
}

fn simulate(error_rate: f64) -> Result<(), ProtocolError> {
    let channel = BitFlipChannel::new(error_rate)?;
    let mut rng = rand::rng();

    for i in 1..=NUM_ITERATIONS {
        println!("\n{GREEN}--- Simulation Run {i} ---{RESET}");
        let result = bb84::run(NUM_QUBITS, &channel, &mut rng)?;
        print_run(&result);
    }
    Ok(())
}

fn simulate_eavesdropping() -> Result<(), ProtocolError> {
    let eve_channel = BitFlipChannel::new(EVE_ERROR_RATE)?;
    let mut rng = rand::rng();

    for i in 1..=NUM_ITERATIONS {
        println!("\n{GREEN}--- Simulation Run {i} ---{RESET}");
        let result = bb84::run_with_eavesdropper(NUM_QUBITS, &eve_channel, &mut rng)?;
        print_eve_run(&result);
    }
    Ok(())
}

fn read_choice() -> io::Result<String> {
    print!("Enter your choice (1/2/3/4/5): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn main() -> io::Result<()> {
    println!("{}", "-".repeat(50));
    println!("{BANNER}");
    println!("{}", "-".repeat(50));

    loop {
        println!("\nChoose an option:");
        println!("[1] Simulate with 0% error");
        println!("[2] Simulate with 7.5% error rate");
        println!("[3] Simulate with 20% error rate");
        println!("[4] Simulate eavesdropping attempt");
        println!("[5] Exit");

        let outcome = match read_choice()?.as_str() {
            "1" => {
                println!("\n{GREEN}--- Simulating with 0% Error Rate ---{RESET}");
                simulate(0.0)
            }
            "2" => {
                println!("\n{YELLOW}--- Simulating with 7.5% Error Rate ---{RESET}");
                simulate(0.075)
            }
            "3" => {
                println!("\n{RED}--- Simulating with 20% Error Rate ---{RESET}");
                simulate(0.2)
            }
            "4" => {
                println!("\n{RED}--- Simulating Eavesdropping Attempt ---{RESET}");
                simulate_eavesdropping()
            }
            "5" => {
                println!("\nExiting the simulation. Goodbye!");
                return Ok(());
            }
            _ => {
                println!("\nInvalid choice. Please enter a valid option.");
                continue;
            }
        };

        if let Err(err) = outcome {
            eprintln!("{RED}Simulation failed: {err}{RESET}");
        }
    }
}
