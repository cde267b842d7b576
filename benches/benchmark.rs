// Performance benchmarks for the skillmatch index and combiner
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use skillmatch::prelude::*;
use skillmatch::{embed_skills, suggest};

fn random_unit_vector(rng: &mut impl Rng, dim: usize) -> Vector {
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data).normalized()
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let mut rng = rand::rng();

    for size in [1_000usize, 10_000].iter() {
        let skills: Vec<Skill> = (0..*size as i64)
            .map(|i| Skill::new(i, format!("skill {i}")))
            .collect();
        let vectors: Vec<SkillVector> = (0..*size as i64)
            .map(|i| SkillVector {
                skill_id: i,
                vector: random_unit_vector(&mut rng, 384),
            })
            .collect();
        let snapshot = IndexSnapshot::build(384, "bench-v1", &skills, vectors).unwrap();
        let query = random_unit_vector(&mut rng, 384);

        group.bench_with_input(BenchmarkId::new("linear_topk", size), size, |b, _| {
            b.iter(|| {
                let results = snapshot.search(black_box(&query), 10).unwrap();
                black_box(results);
            });
        });
    }

    group.finish();
}

fn benchmark_suggest(c: &mut Criterion) {
    let embedder = HashEmbedder::new(384);
    let skills: Vec<Skill> = (0..5_000i64)
        .map(|i| Skill::new(i, format!("skill {i}")))
        .collect();
    let vectors = embed_skills(&embedder, &skills).unwrap();
    let snapshot = IndexSnapshot::build(384, embedder.version(), &skills, vectors).unwrap();

    let index = VectorIndex::new();
    index.replace(snapshot);
    let mapper = RoleMapper::new();
    mapper.replace(MappingSnapshot::build(vec![(
        "Backend Developer".to_string(),
        vec!["skill 42".to_string(), "skill 7".to_string()],
    )]));

    c.bench_function("suggest_hybrid", |b| {
        b.iter(|| {
            let outcome = suggest(
                &index,
                &mapper,
                &embedder,
                &DamerauLevenshtein,
                black_box("Senior Backend Developer"),
                &SuggestOptions::default(),
            )
            .unwrap();
            black_box(outcome);
        });
    });
}

criterion_group!(benches, benchmark_search, benchmark_suggest);
criterion_main!(benches);
