//! View model for a completed estimate.

use serde::Serialize;
use std::fmt;

use crate::domain::valuation::{
    format_currency, format_range, AIAnalysis, BuyerPersona, Confidence, RecentSales, SaleRecord,
    Severity,
};

/// Everything the result panel shows, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    /// Point estimate, e.g. `£275,000`.
    pub estimate: String,
    /// `£250,000 - £300,000`, when an analysis supplied the range.
    pub range: Option<String>,
    pub confidence: Option<ConfidenceView>,
    pub analysis: Option<String>,
    pub location: Option<DetailSectionView>,
    pub education: Option<DetailSectionView>,
    pub transport: Option<DetailSectionView>,
    pub market_activity: Option<MarketActivityView>,
    pub price_changes: Option<String>,
    pub buyer_persona: Option<BuyerPersonaView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfidenceView {
    pub level: Confidence,
    pub description: &'static str,
    pub severity: Severity,
}

/// A titled block of prose plus bullet items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailSectionView {
    pub title: &'static str,
    pub description: Option<String>,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MarketActivityView {
    Text(String),
    Records(Vec<SaleRecordView>),
}

/// One sale; absent fields stay absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRecordView {
    pub address: Option<String>,
    pub price: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyerPersonaView {
    pub summary: Option<String>,
    pub demographics: Vec<String>,
    pub motivations: Vec<String>,
}

impl ResultView {
    /// Builds the view for a point value and, when available, its analysis.
    pub fn build(point_value: f64, analysis: Option<&AIAnalysis>) -> Self {
        let mut view = Self {
            estimate: format_currency(point_value),
            range: None,
            confidence: None,
            analysis: None,
            location: None,
            education: None,
            transport: None,
            market_activity: None,
            price_changes: None,
            buyer_persona: None,
        };

        let Some(analysis) = analysis else {
            return view;
        };

        view.range = Some(format_range(&analysis.estimated_value));
        view.confidence = analysis.confidence.map(|level| ConfidenceView {
            level,
            description: level.description(),
            severity: level.severity(),
        });
        view.analysis = non_blank(analysis.analysis.as_deref());

        if let Some(details) = &analysis.details {
            view.location = details.location.as_ref().map(|l| DetailSectionView {
                title: "Location",
                description: non_blank(l.description.as_deref()),
                items: l.amenities.clone(),
            });
            view.education = details.education.as_ref().map(|e| DetailSectionView {
                title: "Schools",
                description: non_blank(e.description.as_deref()),
                items: e.schools.clone(),
            });
            view.transport = details.transport.as_ref().map(|t| DetailSectionView {
                title: "Transport",
                description: non_blank(t.description.as_deref()),
                items: t.links.clone(),
            });
            if let Some(market) = &details.market_activity {
                view.market_activity = market.recent_sales.as_ref().map(market_activity_view);
                view.price_changes = non_blank(market.price_changes.as_deref());
            }
        }

        view.buyer_persona = analysis.buyer_persona.as_ref().map(buyer_persona_view);
        view
    }

    /// The detail sections that are present, in display order.
    pub fn sections(&self) -> impl Iterator<Item = &DetailSectionView> {
        [&self.location, &self.education, &self.transport]
            .into_iter()
            .flatten()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn market_activity_view(sales: &RecentSales) -> MarketActivityView {
    match sales {
        RecentSales::Text(text) => MarketActivityView::Text(text.clone()),
        RecentSales::Records(records) => {
            MarketActivityView::Records(records.iter().map(sale_record_view).collect())
        }
    }
}

fn sale_record_view(record: &SaleRecord) -> SaleRecordView {
    SaleRecordView {
        address: non_blank(record.address.as_deref()),
        price: record.price.map(format_currency),
        date: non_blank(record.date.as_deref()),
    }
}

fn buyer_persona_view(persona: &BuyerPersona) -> BuyerPersonaView {
    BuyerPersonaView {
        summary: non_blank(persona.summary.as_deref()),
        demographics: persona.demographics.clone(),
        motivations: persona.motivations.clone(),
    }
}

impl fmt::Display for SaleRecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.address, &self.price, &self.date]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        f.write_str(&parts.join(", "))
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Estimated value: {}", self.estimate)?;
        if let Some(range) = &self.range {
            writeln!(f, "Range: {}", range)?;
        }
        if let Some(confidence) = &self.confidence {
            writeln!(f, "Confidence: {}. {}", confidence.level, confidence.description)?;
        }
        if let Some(analysis) = &self.analysis {
            writeln!(f, "\n{}", analysis)?;
        }

        for section in self.sections() {
            writeln!(f, "\n{}", section.title)?;
            if let Some(description) = &section.description {
                writeln!(f, "{}", description)?;
            }
            for item in &section.items {
                writeln!(f, "- {}", item)?;
            }
        }

        if self.market_activity.is_some() || self.price_changes.is_some() {
            writeln!(f, "\nMarket activity")?;
            match &self.market_activity {
                Some(MarketActivityView::Text(text)) => writeln!(f, "{}", text)?,
                Some(MarketActivityView::Records(records)) => {
                    for record in records {
                        writeln!(f, "- {}", record)?;
                    }
                }
                None => {}
            }
            if let Some(changes) = &self.price_changes {
                writeln!(f, "Price changes: {}", changes)?;
            }
        }

        if let Some(persona) = &self.buyer_persona {
            writeln!(f, "\nLikely buyers")?;
            if let Some(summary) = &persona.summary {
                writeln!(f, "{}", summary)?;
            }
            if !persona.demographics.is_empty() {
                writeln!(f, "Demographics: {}", persona.demographics.join(", "))?;
            }
            if !persona.motivations.is_empty() {
                writeln!(f, "Motivations: {}", persona.motivations.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::valuation::validate_analysis;
    use serde_json::json;

    fn analysis(payload: serde_json::Value) -> AIAnalysis {
        validate_analysis(&payload).unwrap()
    }

    #[test]
    fn estimate_only_view() {
        let view = ResultView::build(275_000.0, None);

        assert_eq!(view.estimate, "£275,000");
        assert!(view.range.is_none());
        assert_eq!(view.to_string(), "Estimated value: £275,000\n");
    }

    #[test]
    fn range_and_confidence_are_formatted() {
        let a = analysis(json!({
            "estimatedValue": {"lower": 250000, "upper": 300000},
            "confidence": "low"
        }));
        let view = ResultView::build(a.estimated_value.midpoint(), Some(&a));

        assert_eq!(view.estimate, "£275,000");
        assert_eq!(view.range.as_deref(), Some("£250,000 - £300,000"));
        let confidence = view.confidence.unwrap();
        assert_eq!(confidence.severity, Severity::Caution);
        assert_eq!(confidence.description, Confidence::Low.description());
    }

    #[test]
    fn sale_records_show_only_present_fields() {
        let a = analysis(json!({
            "estimatedValue": {"lower": 1, "upper": 2},
            "details": {"marketActivity": {"recentSales": [
                {"address": "1 Rd", "price": 300000, "date": "2024-01-01"},
                {"price": 299999.5}
            ]}}
        }));
        let view = ResultView::build(1.5, Some(&a));

        let Some(MarketActivityView::Records(records)) = &view.market_activity else {
            panic!("expected records, got {:?}", view.market_activity);
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].to_string(), "1 Rd, £300,000, 2024-01-01");
        assert_eq!(records[1].address, None);
        assert_eq!(records[1].to_string(), "£300,000");
    }

    #[test]
    fn text_recent_sales_render_verbatim() {
        let a = analysis(json!({
            "estimatedValue": {"lower": 1, "upper": 2},
            "details": {"marketActivity": {"recentSales": "Stable", "priceChanges": "Up 2%"}}
        }));
        let view = ResultView::build(1.5, Some(&a));

        assert_eq!(
            view.market_activity,
            Some(MarketActivityView::Text("Stable".to_string()))
        );
        let rendered = view.to_string();
        assert!(rendered.contains("Market activity\nStable\nPrice changes: Up 2%"));
    }

    #[test]
    fn absent_sections_are_omitted() {
        let a = analysis(json!({
            "estimatedValue": {"lower": 1, "upper": 2},
            "details": {"transport": {"links": ["Central line"]}}
        }));
        let view = ResultView::build(1.5, Some(&a));

        let titles: Vec<_> = view.sections().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Transport"]);
        let rendered = view.to_string();
        assert!(rendered.contains("Transport\n- Central line"));
        assert!(!rendered.contains("Schools"));
        assert!(!rendered.contains("Market activity"));
    }

    #[test]
    fn buyer_persona_is_rendered() {
        let a = analysis(json!({
            "estimatedValue": {"lower": 1, "upper": 2},
            "buyerPersona": {
                "summary": "Young families",
                "demographics": ["30-45"],
                "motivations": ["schools", "space"]
            }
        }));
        let rendered = ResultView::build(1.5, Some(&a)).to_string();

        assert!(rendered.contains("Likely buyers\nYoung families"));
        assert!(rendered.contains("Motivations: schools, space"));
    }
}
