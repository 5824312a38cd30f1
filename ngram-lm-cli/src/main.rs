use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lm_core::io;
use lm_core::model::{ModelConfig, NGramLanguageModel, evaluate};

/// Trains an n-gram language model and reports its perplexity on a test corpus.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
	/// Training corpus, one tokenized sentence per line.
	pub train_file: PathBuf,

	/// Corpus to score, one tokenized sentence per line.
	pub predict_file: PathBuf,

	/// N-gram order.
	#[arg(short = 'n', long, default_value_t = 3)]
	pub order: usize,

	/// Add-K smoothing constant.
	#[arg(short, long, default_value_t = 0.0)]
	pub k: f64,

	/// Interpolation weights, lowest order first (one per order, summing to 1).
	#[arg(short, long, value_delimiter = ',')]
	pub lambdas: Option<Vec<f64>>,

	/// Unigrams seen at most this many times are mapped to a word-shape class.
	#[arg(long, default_value_t = 5)]
	pub low_frequency: u64,

	/// Unigrams seen at most this many times after classification become <UNK>.
	#[arg(long, default_value_t = 6)]
	pub unk_threshold: u64,

	/// Directory receiving the mapping list, vocabulary counts and predictions.
	#[arg(long, default_value = ".")]
	pub out_dir: PathBuf,

	/// Reuse a trained model stored next to the training file (`.bin`),
	/// training and saving it when absent.
	#[arg(long)]
	pub cache: bool,
}

impl Args {
	fn model_config(&self) -> ModelConfig {
		let config = ModelConfig::new(self.order)
			.with_k(self.k)
			.with_low_frequency_threshold(self.low_frequency)
			.with_unk_threshold(self.unk_threshold);
		match &self.lambdas {
			Some(weights) => config.with_interpolation(weights.clone()),
			None => config,
		}
	}
}

/// Trains the model, writing the diagnostic dumps of a fresh training run.
fn train(args: &Args) -> anyhow::Result<NGramLanguageModel> {
	let mut model = NGramLanguageModel::new(args.model_config())?;
	let lines = io::read_lines(&args.train_file)
		.with_context(|| format!("reading training corpus {}", args.train_file.display()))?;
	model.train(&lines)?;

	let counts_path = args.out_dir.join("VocabularyCount.txt");
	io::write_vocabulary_counts(&counts_path, model.original_vocabulary_counts())
		.with_context(|| format!("writing {}", counts_path.display()))?;
	log::info!("Original vocabulary counts are saved to {}", counts_path.display());

	let mapping_path = args.out_dir.join("mappingList.txt");
	io::write_mapping_list(&mapping_path, model.word_classes())
		.with_context(|| format!("writing {}", mapping_path.display()))?;
	log::info!("Mapping list is saved to {}", mapping_path.display());

	Ok(model)
}

fn load_or_train(args: &Args) -> anyhow::Result<NGramLanguageModel> {
	if !args.cache {
		return train(args);
	}

	let binary_data_path = io::build_output_path(&args.train_file, "bin")?;
	if binary_data_path.exists() {
		let model = NGramLanguageModel::load(&binary_data_path)
			.with_context(|| format!("loading model {}", binary_data_path.display()))?;
		if model.config() != &args.model_config() {
			anyhow::bail!(
				"cached model {} was trained with a different configuration",
				binary_data_path.display()
			);
		}
		log::info!("Loaded trained model from {}", binary_data_path.display());
		return Ok(model);
	}

	let model = train(args)?;
	model.save(&binary_data_path)
		.with_context(|| format!("saving model {}", binary_data_path.display()))?;
	Ok(model)
}

fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let model = load_or_train(&args)?;

	let lines = io::read_lines(&args.predict_file)
		.with_context(|| format!("reading prediction corpus {}", args.predict_file.display()))?;
	let prediction = model.predict(&lines)?;

	let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
	let prediction_path = args.out_dir.join(io::prediction_file_name(&timestamp));
	io::write_predictions(&prediction_path, &prediction)
		.with_context(|| format!("writing {}", prediction_path.display()))?;
	log::info!("Prediction results (log probability) are saved to {}", prediction_path.display());

	let perplexity = evaluate(&prediction)?;
	println!("{}", perplexity);

	Ok(())
}
