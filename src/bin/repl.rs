use dicelang::{roll::DEFAULT_MAX_ROLLS, RollContext, Roller};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::env;
use std::io::{self, BufRead, Write};

fn max_rolls() -> Result<Option<usize>, Box<dyn std::error::Error>> {
    match env::var("DICE_MAX_ROLLS") {
        Ok(s) => match s.trim().parse()? {
            0 => Ok(None),
            n => Ok(Some(n)),
        },
        Err(_) => Ok(Some(DEFAULT_MAX_ROLLS)),
    }
}

fn run<R: Roller>(mut ctx: RollContext<R>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print!("> ");
    io::stdout().flush()?;
    while let Some(line) = lines.next() {
        let line = line?;
        if !line.trim().is_empty() {
            match dicelang::roll_with(&line, &mut ctx) {
                Ok(outcomes) => {
                    for outcome in outcomes {
                        println!("{}", outcome);
                        for warning in &outcome.warnings {
                            println!("note: {}", warning);
                        }
                    }
                }
                Err(why) => eprintln!("error: {}", why),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let max_rolls = max_rolls()?;
    match env::var("DICE_SEED") {
        Ok(seed) => {
            let seed: u64 = seed.trim().parse()?;
            log::info!("using seed {}", seed);
            run(RollContext::new(max_rolls, ChaCha20Rng::seed_from_u64(seed)))?;
        }
        Err(_) => run(RollContext::new(max_rolls, rand::thread_rng()))?,
    }
    Ok(())
}
