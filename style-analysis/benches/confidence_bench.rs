//! Confidence scoring benchmark (1K, 10K matches through the pipeline).

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use style_analysis::confidence::{ConfidencePipeline, ScoreInput};
use style_core::config::AdjustmentFactors;
use style_core::model::analysis::{ContentTypeModifier, RuleReliability};
use style_core::model::document::ContentType;
use style_core::model::error::RuleCategory;

fn make_inputs(n: usize) -> Vec<(String, RuleCategory, f64, Option<f64>)> {
    (0..n)
        .map(|i| {
            let category = match i % 4 {
                0 => RuleCategory::Grammar,
                1 => RuleCategory::Tone,
                2 => RuleCategory::Claims,
                _ => RuleCategory::Structure,
            };
            let signal = 0.5 + ((i % 40) as f64) * 0.01;
            let evidence = if i % 3 == 0 { Some(0.6 + ((i % 30) as f64) * 0.01) } else { None };
            (format!("rule_{}", i % 25), category, signal, evidence)
        })
        .collect()
}

fn bench_confidence_scoring(c: &mut Criterion) {
    let pipeline = ConfidencePipeline::new(
        Arc::new(RuleReliability::default()),
        Arc::new(ContentTypeModifier::default()),
        0.35,
        AdjustmentFactors::default(),
        10_000,
    );

    let inputs_1k = make_inputs(1_000);
    let inputs_10k = make_inputs(10_000);

    c.bench_function("confidence_1k_matches", |b| {
        b.iter(|| {
            for (rule_id, category, signal, evidence_score) in &inputs_1k {
                let breakdown = pipeline.score(black_box(ScoreInput {
                    rule_id,
                    category: category.clone(),
                    content_type: ContentType::Technical,
                    signal: *signal,
                    evidence_score: *evidence_score,
                    threshold_override: None,
                }));
                black_box(breakdown);
            }
        })
    });

    c.bench_function("confidence_10k_matches", |b| {
        b.iter(|| {
            for (rule_id, category, signal, evidence_score) in &inputs_10k {
                let breakdown = pipeline.score(black_box(ScoreInput {
                    rule_id,
                    category: category.clone(),
                    content_type: ContentType::Technical,
                    signal: *signal,
                    evidence_score: *evidence_score,
                    threshold_override: None,
                }));
                black_box(breakdown);
            }
        })
    });
}

criterion_group!(benches, bench_confidence_scoring);
criterion_main!(benches);
