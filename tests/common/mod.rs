use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use egot::api::{ApiError, CelebrityApi, Resource};
use egot::model::{
    Award, AwardType, Celebrity, CelebrityBasic, CelebrityWithProgress, OscarCeremony, Suggestion,
};
use uuid::Uuid;

/// In-memory API with per-call latency, recording every request
#[derive(Default)]
pub struct MockApi {
    pub celebrities: HashMap<String, Celebrity>,
    pub suggestions: HashMap<String, Vec<Suggestion>>,
    pub latency: HashMap<String, Duration>,
    /// Never answer `search_celebrity`
    pub hang: bool,
    /// Fail every autocomplete
    pub autocomplete_error: Option<ApiError>,
    pub autocomplete_calls: RefCell<Vec<String>>,
    pub search_calls: Cell<usize>,
}

impl MockApi {
    pub fn with_celebrity(mut self, celebrity: Celebrity) -> Self {
        self.celebrities.insert(celebrity.name.clone(), celebrity);
        self
    }

    pub fn with_suggestions(mut self, query: &str, names: &[&str]) -> Self {
        self.suggestions
            .insert(query.to_string(), names.iter().map(|n| suggestion(n)).collect());
        self
    }

    pub fn with_latency(mut self, key: &str, latency: Duration) -> Self {
        self.latency.insert(key.to_string(), latency);
        self
    }

    pub fn autocomplete_queries(&self) -> Vec<String> {
        self.autocomplete_calls.borrow().clone()
    }

    async fn wait(&self, key: &str) {
        if let Some(latency) = self.latency.get(key) {
            tokio::time::sleep(*latency).await;
        }
    }
}

impl CelebrityApi for MockApi {
    async fn search_celebrity(&self, name: &str) -> Result<Celebrity, ApiError> {
        self.search_calls.set(self.search_calls.get() + 1);
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.wait(name).await;
        self.celebrities
            .get(name)
            .cloned()
            .ok_or(ApiError::NotFound(Resource::Celebrity))
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<Suggestion>, ApiError> {
        self.autocomplete_calls.borrow_mut().push(query.to_string());
        self.wait(query).await;
        if let Some(e) = &self.autocomplete_error {
            return Err(e.clone());
        }
        Ok(self.suggestions.get(query).cloned().unwrap_or_default())
    }

    async fn close_to_egot(&self, _limit: Option<usize>) -> Result<Vec<CelebrityWithProgress>, ApiError> {
        Ok(Vec::new())
    }

    async fn egot_winners(&self, _limit: Option<usize>) -> Result<Vec<CelebrityWithProgress>, ApiError> {
        Ok(Vec::new())
    }

    async fn no_awards(&self, _limit: Option<usize>) -> Result<Vec<CelebrityBasic>, ApiError> {
        Ok(Vec::new())
    }

    async fn oscar_ceremony(&self, _year: i32) -> Result<OscarCeremony, ApiError> {
        Err(ApiError::NotFound(Resource::Ceremony))
    }

    async fn oscar_years(&self) -> Result<Vec<i32>, ApiError> {
        Ok(Vec::new())
    }
}

pub fn suggestion(name: &str) -> Suggestion {
    Suggestion {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        photo_url: None,
    }
}

pub fn award(kind: AwardType, year: i32, is_winner: bool) -> Award {
    Award {
        id: Uuid::new_v4(),
        celebrity_id: Uuid::nil(),
        kind,
        year,
        work: None,
        category: String::from("Best Performance"),
        is_winner,
        ceremony_date: None,
        is_upcoming: None,
    }
}

pub fn celebrity(name: &str, awards: Vec<Award>) -> Celebrity {
    Celebrity {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        photo_url: None,
        summary: None,
        last_updated: None,
        awards,
    }
}
