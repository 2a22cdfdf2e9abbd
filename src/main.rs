use onemax::prelude::*;
use onemax::representation::{
    self, DIFFERENT_FOUR_MAXIMA, FIVE_NGG, FIVE_UBL, FIVE_WORST, FOUR_MAXIMA, ONE_MAXIMA,
    THREE_MAXIMA, TWO_MAXIMA,
};

fn main() {
    let mut cfg = ExperimentConfig::default();
    let mut rep = Representation::Binary;
    let mut target: Option<u64> = None;
    let mut positional = 0;

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rep" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                rep = representation_by_name(v).unwrap_or_else(|| {
                    eprintln!("error: unknown representation {v:?}");
                    usage_and_exit(2)
                });
                i += 2;
            }
            "--sa" => {
                cfg.algorithm = Algorithm::Sa;
                i += 1;
            }
            "--es" => {
                cfg.algorithm = Algorithm::Es;
                i += 1;
            }
            "--seed" => {
                let v = args.get(i + 1).unwrap_or_else(|| usage_and_exit(2));
                cfg.seed = Some(parse_integer(v));
                i += 2;
            }
            "--help" | "-h" => usage_and_exit(0),
            arg => {
                // Positional integers fill a, p, g, e left to right.
                let value = parse_integer(arg);
                match positional {
                    0 => target = Some(value),
                    1 => cfg.population = value as usize,
                    2 => cfg.generations = value as usize,
                    3 => cfg.experiments = value as usize,
                    _ => {
                        eprintln!("error: too many positional arguments");
                        usage_and_exit(2)
                    }
                }
                positional += 1;
                i += 1;
            }
        }
    }

    // A table representation fixes the genome length; the arithmetic
    // encodings use the configured default.
    if let Some(len) = rep.fixed_len() {
        cfg.genome_len = len;
    }
    let target = target.unwrap_or_else(|| representation::max_phenotype(cfg.genome_len));

    let fitness = OneMax::new(rep, target, cfg.genome_len).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    let report = run_experiment(&cfg, fitness).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    println!("# Generation\tratio_optimal\tmean_fitness");
    for stats in &report.generations {
        println!(
            "{}\t{}\t{}",
            stats.generation, stats.fraction_at_optimum, stats.mean_fitness
        );
    }

    match report.mean_generations_to_optimum() {
        Some(mean) => eprintln!("Mean generation to optimal solution: {mean}"),
        None => eprintln!(
            "No trial reached the optimum within {} generations",
            cfg.generations
        ),
    }
}

/// Parses a positional or flag integer. Malformed input is a reported,
/// user-visible error, never a silent fallback value.
fn parse_integer(arg: &str) -> u64 {
    arg.parse().unwrap_or_else(|_| {
        eprintln!("error: expected an integer argument, got {arg:?}");
        usage_and_exit(2)
    })
}

fn representation_by_name(name: &str) -> Option<Representation> {
    let table: &[u64] = match name {
        "binary" => return Some(Representation::Binary),
        "gray" => return Some(Representation::Gray),
        "one-maxima" => &ONE_MAXIMA,
        "two-maxima" => &TWO_MAXIMA,
        "three-maxima" => &THREE_MAXIMA,
        "four-maxima" => &FOUR_MAXIMA,
        "different-four-maxima" => &DIFFERENT_FOUR_MAXIMA,
        "five-worst" => &FIVE_WORST,
        "five-ubl" => &FIVE_UBL,
        "five-ngg" => &FIVE_NGG,
        _ => return None,
    };
    let rep = Representation::from_table(table.to_vec())
        .expect("bundled tables are valid permutations");
    Some(rep)
}

fn usage_and_exit(code: i32) -> ! {
    eprintln!(
        "Usage:\n  onemax [a] [p] [g] [e] [options]\n\nPositional integer arguments (fill left to right, all optional):\n  a   Target phenotype value (default: largest representable)\n  p   Population size per trial (default: 1)\n  g   Number of generations (default: 2000)\n  e   Number of independent trials (default: 100000)\n\nOptions:\n  --rep NAME   Representation: binary, gray, one-maxima, two-maxima,\n               three-maxima, four-maxima, different-four-maxima,\n               five-worst, five-ubl, five-ngg (default: binary)\n  --sa / --es  Search algorithm (default: --sa)\n  --seed SEED  Deterministic base seed\n  --help       Show this help\n\nOutput: one line per generation on stdout,\n  generation<TAB>fraction_at_optimum<TAB>mean_fitness\nplus the mean generation-to-optimum on stderr.\n"
    );
    std::process::exit(code)
}
