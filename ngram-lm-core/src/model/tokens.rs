/// Left padding for windows that extend before the start of a line.
pub const START: &str = "<START>";

/// Marker appended to every line.
pub const STOP: &str = "<STOP>";

/// Bucket for tokens collapsed because of their low frequency.
pub const UNK: &str = "<UNK>";

/// Class of a rare token matching no word-shape pattern.
pub const OTHER: &str = "<OTHER>";

/// Splits a line on whitespace and appends the `<STOP>` marker.
pub fn tokenize(line: &str) -> Vec<String> {
	line.split_whitespace()
		.map(str::to_owned)
		.chain(std::iter::once(STOP.to_owned()))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tokenize_appends_stop() {
		assert_eq!(tokenize("a  b\tc"), vec!["a", "b", "c", STOP]);
	}

	#[test]
	fn test_tokenize_empty_line() {
		assert_eq!(tokenize("   "), vec![STOP]);
	}
}
