//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::content::{
    FAQS, FEATURES, Faq, Feature, HERO_MARKETS, HIGHLIGHTS, PriceChart, REASONS, Reason,
    TESTIMONIALS, Testimonial,
};
use crate::filters;
use crate::state::AppState;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub markets: &'static [&'static str],
    pub chart: PriceChart,
    pub features: &'static [Feature],
    pub reasons: &'static [Reason],
    pub testimonials: &'static [Testimonial],
    pub faqs: &'static [Faq],
    pub highlights: &'static [&'static str],
    pub whatsapp_number: Option<String>,
}

/// Render the landing page with a freshly generated price chart.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    HomeTemplate {
        markets: HERO_MARKETS,
        chart: PriceChart::generate(),
        features: FEATURES,
        reasons: REASONS,
        testimonials: TESTIMONIALS,
        faqs: FAQS,
        highlights: HIGHLIGHTS,
        whatsapp_number: state.config().whatsapp_number.clone(),
    }
}
