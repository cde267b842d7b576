// Integration tests for skillmatch
use skillmatch::prelude::*;
use skillmatch::{normalize_text, MappingStore};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Test embedder with a fixed vocabulary: each known word owns one axis,
/// so cosine scores are exact and collision-free in assertions.
struct VocabEmbedder {
    vocab: Vec<&'static str>,
}

impl VocabEmbedder {
    fn new(vocab: Vec<&'static str>) -> Self {
        Self { vocab }
    }
}

impl Embedder for VocabEmbedder {
    fn dimension(&self) -> usize {
        self.vocab.len()
    }

    fn version(&self) -> &str {
        "vocab-v1"
    }

    fn embed(&self, text: &str) -> Result<Vector> {
        let mut data = vec![0.0f32; self.vocab.len()];
        for token in normalize_text(text).split_whitespace() {
            if let Some(axis) = self.vocab.iter().position(|word| *word == token) {
                data[axis] += 1.0;
            }
        }
        let mut vector = Vector::new(data);
        vector.normalize();
        Ok(vector)
    }
}

/// Catalog that can be flipped into a failing state mid-test
struct ToggleCatalog {
    skills: Vec<Skill>,
    fail: AtomicBool,
}

impl ToggleCatalog {
    fn new(skills: Vec<Skill>) -> Self {
        Self {
            skills,
            fail: AtomicBool::new(false),
        }
    }

    fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::Release);
    }
}

impl SkillCatalog for ToggleCatalog {
    fn fetch_active_skills(&self) -> std::result::Result<Vec<Skill>, CatalogError> {
        if self.fail.load(Ordering::Acquire) {
            return Err(CatalogError::Connectivity("catalog unreachable".into()));
        }
        Ok(self.skills.clone())
    }
}

fn catalog_skills() -> Vec<Skill> {
    vec![
        Skill::new(101, "MongoDB"),
        Skill::new(102, "Express.js"),
        Skill::new(103, "React.js"),
        Skill::new(104, "Node.js"),
        Skill::new(105, "Python"),
        Skill::new(106, "Pandas"),
        Skill::new(107, "Data Science"),
    ]
}

fn test_vocab() -> Vec<&'static str> {
    vec![
        "mongodb",
        "express.js",
        "react.js",
        "node.js",
        "python",
        "pandas",
        "data",
        "science",
        "scientist",
    ]
}

fn vocab_service(dir: &Path, catalog: Arc<dyn SkillCatalog>) -> SkillService {
    let embedder = Arc::new(VocabEmbedder::new(test_vocab()));
    let mut config = ServiceConfig::new(dir);
    config.dimension = embedder.dimension();
    SkillService::new(config, catalog, embedder).unwrap()
}

const MERN_SKILLS: [&str; 4] = ["MongoDB", "Express.js", "React.js", "Node.js"];

fn mern_skill_strings() -> Vec<String> {
    MERN_SKILLS.iter().map(|s| s.to_string()).collect()
}

#[test]
fn mapped_mern_stack_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let service = vocab_service(dir.path(), Arc::new(ToggleCatalog::new(catalog_skills())));
    service.refresh(true).unwrap();
    service
        .add_mapping("MERN Stack Developer", &mern_skill_strings())
        .unwrap();

    let outcome = service
        .suggest("Senior MERN Stack Developer", &SuggestOptions::default())
        .unwrap();

    assert_eq!(outcome.normalized_role, "mern stack");
    assert_eq!(outcome.search_method, SearchMethod::Mapped);
    assert_eq!(outcome.skills.len(), 4);
    for (suggestion, expected_name) in outcome.skills.iter().zip(MERN_SKILLS) {
        assert_eq!(suggestion.skill_name, expected_name);
        assert_eq!(suggestion.source, Source::Mapped);
        assert!((suggestion.confidence - 0.95).abs() < 1e-6);
    }
}

#[test]
fn semantic_search_reports_semantic_method_and_honors_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let service = vocab_service(dir.path(), Arc::new(ToggleCatalog::new(catalog_skills())));
    service.refresh(true).unwrap();
    service
        .add_mapping("MERN Stack Developer", &mern_skill_strings())
        .unwrap();

    let opts = SuggestOptions::default().with_mapping(false);
    let outcome = service.suggest("Python", &opts).unwrap();

    assert_eq!(outcome.search_method, SearchMethod::Semantic);
    assert!(!outcome.skills.is_empty());
    assert_eq!(outcome.skills[0].skill_id, 105);
    assert!((outcome.skills[0].confidence - 1.0).abs() < 1e-5);
    for suggestion in &outcome.skills {
        assert_eq!(suggestion.source, Source::Semantic);
        assert!(suggestion.confidence >= opts.threshold);
        assert!(suggestion.confidence <= 1.0);
    }
}

#[test]
fn unmapped_role_falls_through_to_semantic() {
    let dir = tempfile::tempdir().unwrap();
    let service = vocab_service(dir.path(), Arc::new(ToggleCatalog::new(catalog_skills())));
    service.refresh(true).unwrap();
    service
        .add_mapping("MERN Stack Developer", &mern_skill_strings())
        .unwrap();

    // No mapping resembles "data scientist"; the shared "data" token puts
    // "Data Science" at cosine 0.5, above the 0.45 threshold.
    let outcome = service
        .suggest("Data Scientist", &SuggestOptions::default())
        .unwrap();

    assert_eq!(outcome.search_method, SearchMethod::Semantic);
    assert!(outcome.skills.iter().any(|s| s.skill_id == 107));
}

#[test]
fn deleting_a_mapping_falls_back_to_semantic() {
    let dir = tempfile::tempdir().unwrap();
    let service = vocab_service(dir.path(), Arc::new(ToggleCatalog::new(catalog_skills())));
    service.refresh(true).unwrap();
    service
        .add_mapping(
            "Data Scientist",
            &["Python".to_string(), "Pandas".to_string()],
        )
        .unwrap();

    let mapped = service
        .suggest("Data Scientist", &SuggestOptions::default())
        .unwrap();
    assert!(mapped
        .skills
        .iter()
        .any(|s| s.skill_id == 105 && s.source == Source::Mapped));

    service.delete_mapping("Data Scientist").unwrap();

    let fallback = service
        .suggest("Data Scientist", &SuggestOptions::default())
        .unwrap();
    assert_eq!(fallback.search_method, SearchMethod::Semantic);
    assert!(fallback.skills.iter().all(|s| s.source == Source::Semantic));
}

#[test]
fn failed_refresh_preserves_the_published_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Arc::new(ToggleCatalog::new(catalog_skills()));
    let service = vocab_service(dir.path(), catalog.clone());
    service.refresh(true).unwrap();
    let before = service.health();
    assert_eq!(before.skills_indexed, 7);

    catalog.set_failing(true);
    let err = service.refresh(true).unwrap_err();
    assert!(matches!(err, Error::Upstream(_)));

    let after = service.health();
    assert_eq!(after.skills_indexed, before.skills_indexed);
    assert!(after.vectors_loaded);

    // Queries keep serving from the surviving snapshot.
    let outcome = service
        .suggest("Python", &SuggestOptions::default().with_mapping(false))
        .unwrap();
    assert_eq!(outcome.skills[0].skill_id, 105);
}

#[test]
fn concurrent_suggest_and_refresh_stay_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Arc::new(ToggleCatalog::new(catalog_skills()));
    let service = Arc::new(vocab_service(dir.path(), catalog));
    service.refresh(true).unwrap();
    service
        .add_mapping("MERN Stack Developer", &mern_skill_strings())
        .unwrap();

    std::thread::scope(|scope| {
        let refresher = service.clone();
        scope.spawn(move || {
            for _ in 0..20 {
                // Reject-on-busy is fine; interleaving is not.
                match refresher.refresh(false) {
                    Ok(_) | Err(Error::RefreshBusy(_)) => {}
                    Err(err) => panic!("refresh failed: {err}"),
                }
            }
        });

        for _ in 0..50 {
            let outcome = service
                .suggest("Senior MERN Stack Developer", &SuggestOptions::default())
                .unwrap();
            // Every query sees a complete snapshot: always all four
            // mapped skills, never a partial view.
            assert_eq!(outcome.skills.len(), 4);
            assert_eq!(outcome.search_method, SearchMethod::Mapped);
        }
    });
}

#[test]
fn validation_errors_reject_the_query_before_search() {
    let dir = tempfile::tempdir().unwrap();
    let service = vocab_service(dir.path(), Arc::new(ToggleCatalog::new(catalog_skills())));
    service.refresh(true).unwrap();

    assert!(matches!(
        service.suggest("  ", &SuggestOptions::default()),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        service.suggest("Python", &SuggestOptions::default().with_limit(0)),
        Err(Error::Validation(_))
    ));
    assert!(matches!(
        service.suggest("Python", &SuggestOptions::default().with_limit(51)),
        Err(Error::Validation(_))
    ));
}

#[test]
fn file_backed_service_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let skills_file = dir.path().join("skills.tsv");
    std::fs::write(
        &skills_file,
        "101\tMongoDB\n102\tExpress.js\n103\tReact.js\n104\tNode.js\n105\tPython\n",
    )
    .unwrap();

    let mapping_file = dir.path().join("role_skills.csv");
    MappingStore::new(&mapping_file)
        .save(&[("MERN Stack Developer".to_string(), mern_skill_strings())])
        .unwrap();

    let build = || {
        let mut config = ServiceConfig::new(dir.path());
        config.mapping_file = mapping_file.clone();
        config.dimension = 384;
        SkillService::new(
            config,
            Arc::new(FileCatalog::new(&skills_file)),
            Arc::new(HashEmbedder::new(384)),
        )
        .unwrap()
    };

    {
        let service = build();
        assert!(!service.load_from_disk().unwrap());
        let outcome = service.refresh(true).unwrap();
        assert_eq!(outcome.skills_indexed, 5);

        let suggested = service
            .suggest("Senior MERN Stack Developer", &SuggestOptions::default())
            .unwrap();
        assert_eq!(suggested.normalized_role, "mern stack");
        let mapped: Vec<&str> = suggested
            .skills
            .iter()
            .filter(|s| s.source == Source::Mapped)
            .map(|s| s.skill_name.as_str())
            .collect();
        assert_eq!(mapped, MERN_SKILLS);
    }

    // Restart: the durable snapshot and mapping file come back without
    // touching the catalog.
    let service = build();
    assert!(service.load_from_disk().unwrap());
    assert_eq!(service.health().skills_indexed, 5);
    assert_eq!(service.mapping_count(), 1);

    let suggested = service
        .suggest("MERN Stack Developer", &SuggestOptions::default())
        .unwrap();
    assert!(suggested
        .skills
        .iter()
        .filter(|s| s.source == Source::Mapped)
        .count() == 4);
}
