use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::model::{Prediction, WordClassMap, WordKey};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub fn read_lines<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `data/train.txt` + `"bin"` → `data/train.bin`
pub fn build_output_path<P: AsRef<Path>>(input_path: P, output_extension: &str) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Name of the prediction dump for a run started at `timestamp`.
///
/// Example: `"20240131-235959"` → `pred-20240131-235959.txt`
pub fn prediction_file_name(timestamp: &str) -> String {
	format!("pred-{}.txt", timestamp)
}

/// Writes the word→class mapping, one `token\t\t=>\tlabel` per line,
/// in the order the tokens were ranked.
pub fn write_mapping_list<P: AsRef<Path>>(path: P, word_classes: &WordClassMap) -> io::Result<()> {
	let mut writer = BufWriter::new(File::create(path)?);
	for (word, label) in word_classes.iter() {
		writeln!(writer, "{}\t\t=>\t{}", word, label)?;
	}
	writer.flush()
}

/// Writes unigram counts, one `token\t\t\tcount` per line.
pub fn write_vocabulary_counts<P: AsRef<Path>>(path: P, counts: &[(WordKey, u64)]) -> io::Result<()> {
	let mut writer = BufWriter::new(File::create(path)?);
	for (key, count) in counts {
		writeln!(writer, "{}\t\t\t{}", key, count)?;
	}
	writer.flush()
}

/// Writes one sentence log-probability per line.
pub fn write_predictions<P: AsRef<Path>>(path: P, prediction: &Prediction) -> io::Result<()> {
	let mut writer = BufWriter::new(File::create(path)?);
	for log_prob in &prediction.sentence_log_probs {
		writeln!(writer, "{}", log_prob)?;
	}
	writer.flush()
}
