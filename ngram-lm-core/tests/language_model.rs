use lm_core::model::{ModelConfig, NGramLanguageModel, WordKey, evaluate};

const CORPUS: [&str; 8] = [
	"the cat sat on the mat",
	"the dog sat on the log",
	"a cat saw the dog",
	"the dog saw a cat on the mat",
	"THE cat ate 99 fish in 2024",
	"a dog ate the fish",
	"the cat and the dog sat",
	"on the mat sat the cat",
];

fn trained(config: ModelConfig) -> NGramLanguageModel {
	let mut model = NGramLanguageModel::new(config).unwrap();
	model.train(CORPUS).unwrap();
	model
}

#[test]
fn test_two_line_unigram_scenario() {
	let config = ModelConfig::new(1).with_k(1.0).with_low_frequency_threshold(1).with_unk_threshold(1);
	let mut model = NGramLanguageModel::new(config).unwrap();
	model.train(["a b a", "b a b"]).unwrap();

	let unigrams = model.counts(1).unwrap();
	assert_eq!(unigrams.get(&WordKey::new(["a"])), Some(3));
	assert_eq!(unigrams.get(&WordKey::new(["b"])), Some(3));
	assert_eq!(unigrams.get(&WordKey::new(["<STOP>"])), Some(2));
	assert_eq!(unigrams.get(&WordKey::new(["<UNK>"])), Some(0));
	assert_eq!(model.vocabulary().len(), 4);

	// (3 + 1) / (8 + 1 * 4)
	let p = model.probability(&WordKey::new(["a"])).unwrap();
	assert!((p - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_probabilities_in_unit_interval() {
	let configs = [
		ModelConfig::new(3).with_k(0.5),
		ModelConfig::new(3).with_k(0.5).with_interpolation(vec![0.2, 0.3, 0.5]),
		ModelConfig::new(2).with_k(1.0).with_low_frequency_threshold(1).with_unk_threshold(1),
	];
	for config in configs {
		let model = trained(config);
		for order in 1..=model.order() {
			for (key, p) in model.parameters(order).unwrap().iter() {
				assert!(p > 0.0 && p <= 1.0, "P({}) = {}", key, p);
			}
		}
	}
}

#[test]
fn test_unigrams_sum_to_one() {
	for k in [0.0, 0.1, 2.0] {
		let model = trained(ModelConfig::new(1).with_k(k).with_low_frequency_threshold(1).with_unk_threshold(2));
		let params = model.parameters(1).unwrap();
		assert_eq!(params.len(), model.vocabulary().len());
		let sum: f64 = params.iter().map(|(_, p)| p).sum();
		assert!((sum - 1.0).abs() < 1e-9, "K = {}: sum = {}", k, sum);
	}
}

#[test]
fn test_maximum_likelihood_without_smoothing() {
	let model = trained(ModelConfig::new(1).with_low_frequency_threshold(1).with_unk_threshold(1));
	let unigrams = model.counts(1).unwrap();
	let total = unigrams.total() as f64;
	for (key, count) in unigrams.iter() {
		assert_eq!(model.probability(key), Some(count as f64 / total));
	}
}

#[test]
fn test_rare_words_route_to_unk() {
	let model = trained(ModelConfig::new(2).with_k(1.0).with_low_frequency_threshold(1).with_unk_threshold(2));
	for (key, count) in model.original_vocabulary_counts() {
		let word = key.words()[0].as_str();
		if *count <= 2 {
			assert!(!model.vocabulary().contains(word), "{} is rare", word);
			if model.word_classes().get(word).is_none() {
				assert_eq!(model.normalize(word), "<UNK>");
			}
		}
	}
	assert!(!model.vocabulary().contains("fish"));
	assert!(!model.vocabulary().contains("2024"));
	assert!(model.vocabulary().contains("the"));
	assert!(model.counts(1).unwrap().get(&WordKey::new(["<UNK>"])).unwrap() > 0);
}

#[test]
fn test_smoothing_lifts_unseen_ngrams() {
	let unseen = ["mat the cat the log"];
	let plain = trained(ModelConfig::new(2).with_low_frequency_threshold(1).with_unk_threshold(1));
	let smoothed = trained(ModelConfig::new(2).with_k(0.5).with_low_frequency_threshold(1).with_unk_threshold(1));

	let key = WordKey::new(["mat", "the"]);
	assert_eq!(plain.probability(&key), None);
	assert_eq!(smoothed.probability(&key), None);

	let plain_prediction = plain.predict(unseen).unwrap();
	let smoothed_prediction = smoothed.predict(unseen).unwrap();
	assert!(plain_prediction.skipped_tokens > 0);
	assert_eq!(smoothed_prediction.skipped_tokens, 0);
	assert_eq!(plain_prediction.token_count, smoothed_prediction.token_count);
}

#[test]
fn test_training_corpus_perplexity() {
	for config in [
		ModelConfig::new(2).with_k(1.0),
		ModelConfig::new(3).with_k(0.01),
		ModelConfig::new(3).with_k(0.5).with_interpolation(vec![0.1, 0.3, 0.6]),
	] {
		let model = trained(config);
		let prediction = model.predict(CORPUS).unwrap();
		assert_eq!(prediction.sentence_log_probs.len(), CORPUS.len());
		assert_eq!(prediction.skipped_tokens, 0);
		let perplexity = evaluate(&prediction).unwrap();
		assert!(perplexity.is_finite());
		assert!(perplexity >= 1.0);
	}
}

#[test]
fn test_held_out_scores_worse_than_training() {
	let model = trained(ModelConfig::new(2).with_k(0.1).with_low_frequency_threshold(1).with_unk_threshold(1));
	let train = evaluate(&model.predict(CORPUS).unwrap()).unwrap();
	let held_out = evaluate(&model.predict(["mat the on sat dog a"]).unwrap()).unwrap();
	assert!(held_out > train);
}

#[test]
fn test_one_hot_interpolation_matches_top_order() {
	let base = ModelConfig::new(3).with_k(0.5).with_low_frequency_threshold(1).with_unk_threshold(1);
	let plain = trained(base.clone());
	let one_hot = trained(base.with_interpolation(vec![0.0, 0.0, 1.0]));

	let top = plain.parameters(3).unwrap();
	assert_eq!(top.len(), one_hot.parameters(3).unwrap().len());
	for (key, p) in top.iter() {
		assert_eq!(one_hot.probability(key), Some(p));
	}
}

#[test]
fn test_word_shape_classes() {
	let model = trained(ModelConfig::new(2).with_k(1.0));
	let classes = model.word_classes();
	assert_eq!(classes.get("99"), Some("<TWO_DIGIT_NUM>"));
	assert_eq!(classes.get("2024"), Some("<FOUR_DIGIT_NUM>"));
	assert_eq!(classes.get("THE"), Some("<ALL_CAPS>"));
	// frequent words keep their surface form
	assert_eq!(classes.get("the"), None);
}
