//! Landing page copy and the hero price chart.
//!
//! The copy is static; the chart is a random walk generated per request so the
//! hero never shows the same line twice.

use rand::Rng;

// =============================================================================
// Static copy
// =============================================================================

/// Words cycled by the hero headline.
pub const HERO_MARKETS: &[&str] = &["US Stocks", "Bitcoin", "Crypto", "Forex"];

/// Options for the contact form's interest select.
pub const INTEREST_OPTIONS: &[&str] = &["US Stocks", "Bitcoin", "Crypto", "Forex", "Other"];

#[derive(Debug, Clone, Copy)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
    pub highlight: &'static str,
}

pub const FEATURES: &[Feature] = &[
    Feature {
        title: "Zero Brokerage = 100% Profit",
        description: "Keep every penny you earn. No hidden fees, no commissions, just pure profit in your pocket.",
        highlight: "Save ₹50,000+ annually",
    },
    Feature {
        title: "Lightning Fast Execution",
        description: "Execute trades in milliseconds. Never miss a profitable opportunity again.",
        highlight: "0.02s execution time",
    },
    Feature {
        title: "Bank-Level Security",
        description: "Your money and data are protected with military-grade encryption and security protocols.",
        highlight: "99.9% uptime guarantee",
    },
    Feature {
        title: "Trade 24/7 Anywhere",
        description: "Never miss the market. Trade from your phone, tablet, or desktop, anytime and anywhere.",
        highlight: "Available on all devices",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Reason {
    pub title: &'static str,
    pub description: &'static str,
    pub stat: &'static str,
}

pub const REASONS: &[Reason] = &[
    Reason {
        title: "Industry Leader",
        description: "Trusted by Fortune 500 companies worldwide",
        stat: "500+ Companies",
    },
    Reason {
        title: "10+ Years Experience",
        description: "Decade of proven success in financial technology",
        stat: "Since 2014",
    },
    Reason {
        title: "Global Reach",
        description: "Operating in 50+ countries with local support",
        stat: "50+ Countries",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Testimonial {
    pub name: &'static str,
    pub role: &'static str,
    pub content: &'static str,
    pub rating: u8,
}

impl Testimonial {
    /// One star glyph per rating point.
    #[must_use]
    pub fn stars(&self) -> String {
        "★".repeat(usize::from(self.rating))
    }
}

pub const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        name: "Sarah Johnson",
        role: "CTO, FinanceFlow Inc.",
        content: "Nextrade transformed our trading operations. The ROI was immediate and substantial.",
        rating: 5,
    },
    Testimonial {
        name: "Michael Chen",
        role: "Investment Director, Capital Ventures",
        content: "The most reliable trading platform we've ever used. Exceptional support team.",
        rating: 5,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQS: &[Faq] = &[
    Faq {
        question: "How secure are my investments with Nextrade?",
        answer: "Nextrade employs bank-grade security protocols with 256-bit SSL encryption, multi-factor authentication, and segregated client accounts. Your funds are protected by regulatory compliance and our comprehensive insurance coverage, ensuring your investment journey remains secure at every step.",
    },
    Faq {
        question: "What does zero brokerage really mean?",
        answer: "Zero brokerage means no hidden fees, no commission charges, and no percentage cuts from your profits. Nextrade revolutionizes trading by eliminating traditional brokerage costs, allowing you to keep 100% of your gains and maximize your investment potential.",
    },
    Faq {
        question: "How do the 500x margin facilities work?",
        answer: "Our advanced margin system provides leverage up to 500x, amplifying your trading power while maintaining strict risk management protocols. This means you can control larger positions with smaller capital, potentially maximizing returns while our sophisticated algorithms help manage exposure.",
    },
    Faq {
        question: "Is 24/7 deposit and withdrawal really available?",
        answer: "Absolutely. Our automated processing system operates around the clock, 365 days a year. Whether it's midnight or weekend, you have instant access to deposit funds or withdraw profits. Our real-time settlement system ensures your financial freedom is never constrained by time.",
    },
];

/// Bullet points in the trading highlight section.
pub const HIGHLIGHTS: &[&str] = &[
    "Real-time market visualization",
    "AI-powered trading insights",
    "Precision entry/exit signals",
    "Advanced analytics dashboard",
];

// =============================================================================
// Price chart
// =============================================================================

/// Number of points on the hero chart.
pub const CHART_POINTS: usize = 10;

const START_PRICE: f64 = 100.0;
const MAX_STEP: f64 = 5.0;

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 200.0;

/// One sample of the generated series.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub label: String,
    pub value: f64,
}

/// Generate `points` samples of a random walk starting from 100.
///
/// Each step moves by a uniform amount in `[-5, 5)`; the running value is kept
/// unrounded and each sample is rounded to cents.
pub fn random_walk<R: Rng + ?Sized>(rng: &mut R, points: usize) -> Vec<PricePoint> {
    let mut value = START_PRICE;
    (1..=points)
        .map(|day| {
            value += rng.random_range(-MAX_STEP..MAX_STEP);
            PricePoint {
                label: format!("Day {day}"),
                value: round_cents(value),
            }
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Chart data prepared for the hero template.
#[derive(Debug, Clone)]
pub struct PriceChart {
    pub points: Vec<PricePoint>,
    /// SVG `points` attribute for a polyline in a 600x200 view box.
    pub polyline: String,
    pub current: String,
    pub change: String,
    pub percent: String,
    pub high: String,
    pub low: String,
    pub rising: bool,
}

impl PriceChart {
    /// Build a chart from a fresh random walk.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_points(random_walk(&mut rand::rng(), CHART_POINTS))
    }

    #[must_use]
    pub fn from_points(points: Vec<PricePoint>) -> Self {
        let high = points.iter().map(|p| p.value).fold(f64::MIN, f64::max);
        let low = points.iter().map(|p| p.value).fold(f64::MAX, f64::min);
        let current = points.last().map_or(START_PRICE, |p| p.value);
        let previous = points
            .len()
            .checked_sub(2)
            .and_then(|i| points.get(i))
            .map_or(current, |p| p.value);

        let change = current - previous;
        let percent = if previous.abs() < f64::EPSILON {
            0.0
        } else {
            change / previous * 100.0
        };

        Self {
            polyline: polyline(&points, low, high),
            current: format!("{current:.2}"),
            change: format!("{change:+.2}"),
            percent: format!("{percent:+.2}"),
            high: format!("{:.2}", if points.is_empty() { current } else { high }),
            low: format!("{:.2}", if points.is_empty() { current } else { low }),
            rising: change >= 0.0,
            points,
        }
    }
}

#[allow(clippy::cast_precision_loss)] // Point counts are tiny
fn polyline(points: &[PricePoint], low: f64, high: f64) -> String {
    let span = if high > low { high - low } else { 1.0 };
    let step = if points.len() > 1 {
        CHART_WIDTH / (points.len() - 1) as f64
    } else {
        0.0
    };

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = step * i as f64;
            let y = CHART_HEIGHT - (p.value - low) / span * CHART_HEIGHT;
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}
