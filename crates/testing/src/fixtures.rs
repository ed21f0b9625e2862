//! Test fixtures for evaluation runs.
//!
//! [`synthetic_run`] returns a fixed, hand-checked set of records; the `random_*`
//! helpers and the `proptest` strategies generate arbitrary ones.

use agent_eval_domain::{EvaluatedRecord, TaskKind};
use fake::{
    faker::lorem::en::{Sentence, Word, Words},
    Fake,
};
use proptest::prelude::*;

use crate::builders::RecordBuilder;

/// Producers used by [`synthetic_run`]
pub const SYNTHETIC_PRODUCERS: [&str; 2] = ["rag", "sequenced"];

/// Task sources used by [`synthetic_run`]
pub const SYNTHETIC_SOURCES: [&str; 4] = [
    "synthetic_constraints",
    "synthetic_long_qa",
    "synthetic_long_summary",
    "synthetic_retrieval",
];

/// A small run with two producers across four task sources.
///
/// Contains one record with neither a reference nor evidence, which scores nothing.
pub fn synthetic_run() -> Vec<EvaluatedRecord> {
    vec![
        RecordBuilder::qa()
            .with_prediction("The vault is in Lisbon")
            .with_reference("the vault is in lisbon")
            .build(),
        RecordBuilder::qa()
            .with_producer("sequenced")
            .with_prediction("It is in Porto")
            .with_reference("the vault is in lisbon")
            .build(),
        RecordBuilder::summarization()
            .with_prediction("memory limits shape retrieval")
            .with_reference("memory limits shape retrieval strategies")
            .build(),
        RecordBuilder::constraint_following()
            .with_prediction("- context is key\n- notes help")
            .with_evidence([
                "Use exactly 2 bullet points.",
                "Mention the keyword 'context'.",
                "Avoid the word 'maybe'.",
            ])
            .build(),
        RecordBuilder::constraint_following()
            .with_producer("rag")
            .with_prediction("maybe context")
            .with_evidence([
                "Use exactly 3 bullet points.",
                "Mention the keyword 'context'.",
                "Avoid the word 'maybe'.",
            ])
            .build(),
        RecordBuilder::new()
            .with_producer("sequenced")
            .with_source("synthetic_retrieval")
            .with_kind(TaskKind::Retrieval)
            .with_prediction("The passage mentions alpha and gamma.")
            .with_evidence(["alpha", "beta"])
            .build(),
        RecordBuilder::new()
            .with_source("synthetic_retrieval")
            .with_kind(TaskKind::Retrieval)
            .with_prediction("No supporting material was provided.")
            .build(),
    ]
}

/// Create a random record that always has a reference
pub fn random_record(producer_id: &str, task_source_id: &str) -> EvaluatedRecord {
    let kinds = TaskKind::all();
    let kind = kinds[(0..kinds.len()).fake::<usize>()];
    let words: Vec<String> = Words(1..6).fake();

    RecordBuilder::new()
        .with_producer(producer_id)
        .with_source(task_source_id)
        .with_kind(kind)
        .with_prediction(Sentence(3..12).fake::<String>())
        .with_reference(Sentence(3..12).fake::<String>())
        .with_evidence(words)
        .build()
}

/// Create `count` random records spread across a few producers and sources
pub fn random_run(count: usize) -> Vec<EvaluatedRecord> {
    (0..count)
        .map(|i| {
            let producer = SYNTHETIC_PRODUCERS[i % SYNTHETIC_PRODUCERS.len()];
            let source = SYNTHETIC_SOURCES[i % SYNTHETIC_SOURCES.len()];
            random_record(producer, source)
        })
        .collect()
}

/// A single random lower-case word
pub fn random_word() -> String {
    Word().fake()
}

/// Strategy producing a task kind
pub fn task_kind_strategy() -> impl Strategy<Value = TaskKind> {
    prop::sample::select(TaskKind::all().to_vec())
}

/// Strategy producing short whitespace-separated texts from a small vocabulary
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "alpha", "beta", "gamma", "delta", "memory", "context", "- item", "maybe",
        ]),
        0..8,
    )
    .prop_map(|words| words.join(" "))
}

/// Strategy producing arbitrary records over a fixed set of producers and sources
pub fn record_strategy() -> impl Strategy<Value = EvaluatedRecord> {
    (
        prop::sample::select(SYNTHETIC_PRODUCERS.to_vec()),
        prop::sample::select(SYNTHETIC_SOURCES.to_vec()),
        task_kind_strategy(),
        text_strategy(),
        prop::option::of(text_strategy()),
        prop::collection::vec(text_strategy(), 0..3),
    )
        .prop_map(|(producer, source, kind, prediction, reference, evidence)| {
            let builder = RecordBuilder::new()
                .with_producer(producer)
                .with_source(source)
                .with_kind(kind)
                .with_prediction(prediction)
                .with_evidence(evidence);
            match reference {
                Some(reference) => builder.with_reference(reference),
                None => builder,
            }
            .build()
        })
}
