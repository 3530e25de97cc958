use std::env;

use markov_gen_core::model::markov_model::MarkovModel;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 6 {
        return Err(format!(
            "usage: {} <window_length> <initial_text> <target_length> <random|seed:N> <corpus_file>",
            args[0]
        )
        .into());
    }

    let window_length: usize = args[1].parse()?;
    let initial_text = &args[2];
    let target_length: usize = args[3].parse()?;

    // 'random' draws a fresh generator each run; 'seed:N' makes runs reproducible
    let mut model = match args[4].as_str() {
        "random" => MarkovModel::new(window_length)?,
        mode => match mode.strip_prefix("seed:") {
            Some(value) => MarkovModel::with_seed(window_length, value.parse()?)?,
            None => return Err(format!("mode must be 'random' or 'seed:N', got '{mode}'").into()),
        },
    };

    // Trains the model, creating the window map
    model.train_from_path(&args[5])?;

    // Generates text, and prints it
    println!("{}", model.generate(initial_text, target_length));

    Ok(())
}
