//! Test doubles for the engine: a scripted classifier that sleeps on tokio's
//! (paused) clock and records how many calls overlapped.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::classifier::Classifier;
use crate::error::ClassifyError;
use crate::models::{Article, ArticleId, Judgment, Label};

pub(crate) fn make_article(id: &str) -> Article {
    Article {
        id:           ArticleId::new(id),
        title:        format!("Headline {id}"),
        description:  format!("Summary for {id}"),
        source:       "Reuters".to_string(),
        url:          Some(format!("https://news.example.com/{id}")),
        published_at: None,
    }
}

/// Articles `a0`, `a1`, ... `a{n-1}`.
pub(crate) fn make_articles(n: usize) -> Vec<Article> {
    (0..n).map(|i| make_article(&format!("a{i}"))).collect()
}

pub(crate) fn judgment(label: Label, score: f64, confidence: f64) -> Judgment {
    Judgment::new(label, score, confidence).unwrap()
}

struct Step {
    delay:  Duration,
    result: Result<Judgment, ClassifyError>,
}

/// Per-article queue of scripted answers; one step is consumed per call.
#[derive(Default)]
pub(crate) struct ScriptedClassifier {
    scripts:   Mutex<HashMap<ArticleId, VecDeque<Step>>>,
    panics:    HashSet<ArticleId>,
    in_flight: AtomicUsize,
    peak:      AtomicUsize,
    calls:     AtomicUsize,
}

impl ScriptedClassifier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(
        self,
        id: &str,
        delay: Duration,
        result: Result<Judgment, ClassifyError>,
    ) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(ArticleId::new(id))
            .or_default()
            .push_back(Step { delay, result });
        self
    }

    /// Panic once the article's scripted steps (if any) are used up.
    pub(crate) fn panic_on(mut self, id: &str) -> Self {
        self.panics.insert(ArticleId::new(id));
        self
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, _ticker: &str, article: &Article) -> Result<Judgment, ClassifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let step = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(&article.id)
            .and_then(|steps| steps.pop_front());

        match step {
            Some(step) => {
                tokio::time::sleep(step.delay).await;
                step.result
            }
            None if self.panics.contains(&article.id) => {
                panic!("scripted panic for {}", article.id)
            }
            None => Err(ClassifyError::MalformedResponse(format!("no script for {}", article.id))),
        }
    }
}
