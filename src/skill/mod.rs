//! Skill front end
//!
//! Turns tagged intents from the voice platform into spoken responses. Every
//! request carries its own [`RequestContext`]; nothing is kept between requests
//! except what the snapshot store holds.

pub mod speech;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::bottom_line::{self, BottomLineSource};
use crate::error::AvalancheError;
use crate::forecast::{DangerTier, summarize};
use crate::service::ForecastService;

/// Resolved slot value: `id` is the lookup key, `name` what the user heard or said
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Launch,
    Help,
    Stop,
    SessionEnded,
    RegionForecast { region: Slot },
    RegionBottomLine { region: Slot },
    StateForecast { state: Slot },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub speech: Option<String>,
    pub reprompt: Option<String>,
    pub end_session: bool,
}

impl SkillResponse {
    fn speak<S: Into<String>>(speech: S) -> Self {
        Self {
            speech: Some(speech.into()),
            reprompt: None,
            end_session: true,
        }
    }

    fn ask<S: Into<String>, R: Into<String>>(speech: S, reprompt: R) -> Self {
        Self {
            speech: Some(speech.into()),
            reprompt: Some(reprompt.into()),
            end_session: false,
        }
    }
}

/// Per-request state handed down explicitly
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub now: DateTime<Utc>,
}

impl RequestContext {
    #[must_use]
    pub fn now() -> Self {
        Self { now: Utc::now() }
    }
}

/// Source of uniform random indexes
pub trait RandomSource: Send + Sync {
    /// Index in `0..len`; `len` is never zero.
    fn index(&self, len: usize) -> usize;
}

/// Thread-local RNG
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

pub struct SkillHandler {
    service: ForecastService,
    bottom_lines: Option<Arc<dyn BottomLineSource>>,
    apologies: Vec<String>,
    random: Box<dyn RandomSource>,
}

impl SkillHandler {
    /// `apologies` must not be empty.
    pub fn new(service: ForecastService, apologies: Vec<String>) -> crate::Result<Self> {
        if apologies.is_empty() {
            return Err(AvalancheError::config("at least one apology message is required"));
        }
        Ok(Self {
            service,
            bottom_lines: None,
            apologies,
            random: Box::new(ThreadRandom),
        })
    }

    #[must_use]
    pub fn with_bottom_lines(mut self, source: Arc<dyn BottomLineSource>) -> Self {
        self.bottom_lines = Some(source);
        self
    }

    #[must_use]
    pub fn with_random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Answer one intent. Failures become apologies, never error details.
    #[instrument(skip(self, ctx))]
    pub async fn handle(&self, intent: &Intent, ctx: &RequestContext) -> SkillResponse {
        match intent {
            Intent::Launch => SkillResponse::ask(speech::LAUNCH, speech::LAUNCH_REPROMPT),
            Intent::Help => SkillResponse::ask(speech::HELP, speech::HELP),
            Intent::Stop => SkillResponse::speak(speech::GOODBYE),
            Intent::SessionEnded => SkillResponse {
                end_session: true,
                ..SkillResponse::default()
            },
            Intent::RegionForecast { region } => self
                .region_forecast(region, ctx)
                .await
                .unwrap_or_else(|e| self.recover(e)),
            Intent::StateForecast { state } => self
                .state_forecast(state, ctx)
                .await
                .unwrap_or_else(|e| self.recover(e)),
            Intent::RegionBottomLine { region } => self
                .region_bottom_line(region, ctx)
                .await
                .unwrap_or_else(|e| self.recover(e)),
        }
    }

    async fn region_forecast(
        &self,
        region: &Slot,
        ctx: &RequestContext,
    ) -> crate::Result<SkillResponse> {
        let forecast = self.service.resolve_region(&region.id, ctx.now).await?;
        Ok(SkillResponse::speak(speech::region_forecast(
            &region.name,
            &forecast,
        )))
    }

    async fn state_forecast(
        &self,
        state: &Slot,
        ctx: &RequestContext,
    ) -> crate::Result<SkillResponse> {
        let forecasts = self.service.resolve_state(&state.id, ctx.now).await?;
        let plan = summarize(&forecasts);
        info!(
            "State {} summarized at tier {} with {} named regions",
            state.id,
            plan.tier.map_or("none", DangerTier::label),
            plan.named_regions.len()
        );
        Ok(SkillResponse::speak(speech::state_summary(
            &state.name,
            &plan,
        )))
    }

    async fn region_bottom_line(
        &self,
        region: &Slot,
        ctx: &RequestContext,
    ) -> crate::Result<SkillResponse> {
        let forecast = self.service.resolve_region(&region.id, ctx.now).await?;
        if !bottom_line::supports_state(&forecast.state) {
            return Ok(SkillResponse::speak(speech::BOTTOM_LINE_WASHINGTON_ONLY));
        }

        let Some(source) = &self.bottom_lines else {
            warn!("No bottom line source configured");
            return Ok(SkillResponse::speak(speech::BOTTOM_LINE_UNAVAILABLE));
        };

        match source.bottom_line(&forecast.link).await {
            Ok(line) => Ok(SkillResponse::speak(speech::bottom_line(
                &region.name,
                &forecast,
                &line,
            ))),
            Err(e) => {
                warn!("Bottom line for {} failed: {}", forecast.name, e);
                Ok(SkillResponse::speak(speech::BOTTOM_LINE_UNAVAILABLE))
            }
        }
    }

    fn recover(&self, err: AvalancheError) -> SkillResponse {
        warn!("Request failed: {}", err);
        if err.is_upstream() {
            return SkillResponse::speak(speech::UPSTREAM_UNAVAILABLE);
        }
        SkillResponse::ask(self.apology(), self.apology())
    }

    fn apology(&self) -> String {
        let index = self.random.index(self.apologies.len());
        self.apologies[index].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bottom_line::BottomLine;
    use crate::cache::MemoryStore;
    use crate::error::FetchError;
    use crate::forecast::{CacheStore, ForecastEntry, ForecastSource};
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource(Result<Vec<ForecastEntry>, FetchError>);

    #[async_trait]
    impl ForecastSource for FixedSource {
        async fn fetch(&self) -> Result<Vec<ForecastEntry>, FetchError> {
            self.0.clone()
        }
    }

    struct FixedBottomLine(Result<BottomLine, String>);

    #[async_trait]
    impl BottomLineSource for FixedBottomLine {
        async fn bottom_line(&self, _link: &str) -> Result<BottomLine, AvalancheError> {
            self.0.clone().map_err(AvalancheError::parse)
        }
    }

    /// Hands out 0, 1, 2, ... modulo the list length
    #[derive(Default)]
    struct Cycle(AtomicUsize);

    impl RandomSource for Cycle {
        fn index(&self, len: usize) -> usize {
            self.0.fetch_add(1, Ordering::SeqCst) % len
        }
    }

    fn entry(name: &str, state: &str, level: i32) -> ForecastEntry {
        ForecastEntry {
            name: name.to_string(),
            center: "Center".to_string(),
            link: format!("https://nwac.us/{name}"),
            state: state.to_string(),
            travel_advice: format!("{name} advice."),
            danger: "moderate".to_string(),
            danger_level: level,
        }
    }

    fn handler(source: FixedSource) -> SkillHandler {
        let cache = CacheStore::new(Arc::new(source), Arc::new(MemoryStore::new()));
        SkillHandler::new(
            ForecastService::new(cache),
            vec!["first".into(), "second".into(), "third".into()],
        )
        .unwrap()
        .with_random(Box::new(Cycle::default()))
    }

    fn healthy() -> SkillHandler {
        handler(FixedSource(Ok(vec![
            entry("Stevens Pass", "WA", 2),
            entry("Mount Shasta", "CA", 1),
            entry("Eastern Sierra", "CA", 3),
        ])))
    }

    fn ctx() -> RequestContext {
        RequestContext {
            now: Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap(),
        }
    }

    fn slot(id: &str, name: &str) -> Slot {
        Slot {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_intent_deserialization() {
        let intent: Intent = serde_json::from_str(
            r#"{"type":"region_forecast","region":{"id":"StevensPass","name":"Stevens Pass"}}"#,
        )
        .unwrap();
        assert_eq!(
            intent,
            Intent::RegionForecast {
                region: slot("StevensPass", "Stevens Pass")
            }
        );

        let intent: Intent = serde_json::from_str(r#"{"type":"help"}"#).unwrap();
        assert_eq!(intent, Intent::Help);
    }

    #[test]
    fn test_empty_apologies_rejected() {
        let cache = CacheStore::new(
            Arc::new(FixedSource(Ok(vec![]))),
            Arc::new(MemoryStore::new()),
        );
        assert!(SkillHandler::new(ForecastService::new(cache), vec![]).is_err());
    }

    #[tokio::test]
    async fn test_launch_and_help_keep_session_open() {
        let handler = healthy();

        let response = handler.handle(&Intent::Launch, &ctx()).await;
        assert_eq!(response.reprompt.as_deref(), Some(speech::LAUNCH_REPROMPT));
        assert!(!response.end_session);

        let response = handler.handle(&Intent::Help, &ctx()).await;
        assert_eq!(response.speech.as_deref(), Some(speech::HELP));
    }

    #[tokio::test]
    async fn test_stop_and_session_end() {
        let handler = healthy();

        let response = handler.handle(&Intent::Stop, &ctx()).await;
        assert_eq!(response.speech.as_deref(), Some(speech::GOODBYE));
        assert!(response.end_session);

        let response = handler.handle(&Intent::SessionEnded, &ctx()).await;
        assert_eq!(response.speech, None);
    }

    #[tokio::test]
    async fn test_region_forecast_uses_spoken_name() {
        let response = healthy()
            .handle(
                &Intent::RegionForecast {
                    region: slot("StevensPass", "stevens"),
                },
                &ctx(),
            )
            .await;

        assert_eq!(
            response.speech.as_deref(),
            Some("The avalanche danger for stevens is moderate. Stevens Pass advice.")
        );
    }

    #[tokio::test]
    async fn test_state_forecast() {
        let response = healthy()
            .handle(
                &Intent::StateForecast {
                    state: slot("CA", "California"),
                },
                &ctx(),
            )
            .await;

        let speech = response.speech.unwrap();
        assert!(speech.contains("in the state of California is Mount Shasta."));
    }

    #[tokio::test]
    async fn test_unknown_region_rotates_apologies() {
        let handler = healthy();
        let intent = Intent::RegionForecast {
            region: slot("Atlantis", "Atlantis"),
        };

        let first = handler.handle(&intent, &ctx()).await;
        assert_eq!(first.speech.as_deref(), Some("first"));
        assert_eq!(first.reprompt.as_deref(), Some("second"));

        let second = handler.handle(&intent, &ctx()).await;
        assert_eq!(second.speech.as_deref(), Some("third"));
        assert_eq!(second.reprompt.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_upstream_failure_message() {
        let handler = handler(FixedSource(Err(FetchError::Status(500))));
        let response = handler
            .handle(
                &Intent::StateForecast {
                    state: slot("WA", "Washington"),
                },
                &ctx(),
            )
            .await;

        assert_eq!(response.speech.as_deref(), Some(speech::UPSTREAM_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_bottom_line_outside_washington() {
        let response = healthy()
            .handle(
                &Intent::RegionBottomLine {
                    region: slot("MountShasta", "Mount Shasta"),
                },
                &ctx(),
            )
            .await;

        assert_eq!(
            response.speech.as_deref(),
            Some(speech::BOTTOM_LINE_WASHINGTON_ONLY)
        );
    }

    #[tokio::test]
    async fn test_bottom_line_in_washington() {
        let line = BottomLine {
            text: "Avoid wind loaded terrain.".to_string(),
            issued: NaiveDate::from_ymd_opt(2026, 1, 19).unwrap(),
        };
        let handler = healthy().with_bottom_lines(Arc::new(FixedBottomLine(Ok(line))));

        let response = handler
            .handle(
                &Intent::RegionBottomLine {
                    region: slot("StevensPass", "Stevens Pass"),
                },
                &ctx(),
            )
            .await;

        let speech = response.speech.unwrap();
        assert!(speech.contains("issued on January 19, 2026"));
        assert!(speech.ends_with("Avoid wind loaded terrain."));
    }

    #[tokio::test]
    async fn test_bottom_line_failures() {
        let intent = Intent::RegionBottomLine {
            region: slot("StevensPass", "Stevens Pass"),
        };

        let response = healthy().handle(&intent, &ctx()).await;
        assert_eq!(response.speech.as_deref(), Some(speech::BOTTOM_LINE_UNAVAILABLE));

        let handler = healthy()
            .with_bottom_lines(Arc::new(FixedBottomLine(Err("no bottom line block".into()))));
        let response = handler.handle(&intent, &ctx()).await;
        assert_eq!(response.speech.as_deref(), Some(speech::BOTTOM_LINE_UNAVAILABLE));
    }

    #[test]
    fn test_thread_random_covers_range() {
        let random = ThreadRandom;
        let mut seen = [0usize; 3];
        for _ in 0..300 {
            let index = random.index(3);
            assert!(index < 3);
            seen[index] += 1;
        }
        assert!(seen.iter().all(|&hits| hits > 0), "draws: {seen:?}");
    }
}
