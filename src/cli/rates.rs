use super::ui;
use crate::cache::RateCache;
use crate::core::conversion::{RateLabel, build_display_set, build_rate_label};
use crate::core::format::{describe_age, format_amount, format_date};
use crate::core::{BASE_CURRENCY, ConversionError, ConversionRequest, RateSnapshot, RateSource};
use crate::loader::{Freshness, LoadedRates, RateLoader};
use crate::preferences::Theme;
use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::Cell;

/// One row of output: a target currency, its rate against the source and,
/// when an amount was given, the converted value.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCard {
    pub code: String,
    pub description: String,
    pub label: RateLabel,
    pub value: Option<f64>,
}

pub fn build_cards(
    snapshot: &RateSnapshot,
    source_code: &str,
    request: Option<&ConversionRequest>,
) -> Result<Vec<RateCard>, ConversionError> {
    let converted = request
        .map(|r| build_display_set(snapshot, r))
        .transpose()?;

    snapshot
        .quotes_with_base()
        .filter(|q| q.code != source_code)
        .map(|q| -> Result<RateCard, ConversionError> {
            let value = converted.as_ref().and_then(|set| {
                set.iter()
                    .find(|c| c.code == q.code)
                    .map(|c| c.converted_amount)
            });
            Ok(RateCard {
                code: q.code.clone(),
                description: q.description.clone(),
                label: build_rate_label(snapshot, source_code, q)?,
                value,
            })
        })
        .collect()
}

pub fn display_cards(
    snapshot: &RateSnapshot,
    source_code: &str,
    request: Option<&ConversionRequest>,
    theme: Theme,
) -> Result<String, ConversionError> {
    let cards = build_cards(snapshot, source_code, request)?;

    let mut table = ui::new_styled_table();
    let mut header = vec![
        ui::header_cell("Currency", theme),
        ui::header_cell("Name", theme),
        ui::header_cell("Rate", theme),
    ];
    if request.is_some() {
        header.push(ui::header_cell("Amount", theme));
    }
    table.set_header(header);

    for card in &cards {
        let mut row = vec![
            Cell::new(&card.code),
            Cell::new(&card.description),
            Cell::new(card.label.to_string()),
        ];
        if request.is_some() {
            row.push(ui::format_optional_cell(card.value, |v| {
                format_amount(v, &card.code)
            }));
        }
        table.add_row(row);
    }

    let title = match request {
        Some(r) => format!(
            "{} {}",
            format_amount(r.amount, &r.source_code),
            r.source_code
        ),
        None => format!("Rates against {source_code}"),
    };

    let mut output = format!("{}\n\n", ui::style_text(&title, ui::StyleType::Title));
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n{}",
        ui::style_text(
            &format!("Rates as of {}", format_date(snapshot.as_of())),
            ui::StyleType::Subtle
        )
    ));
    Ok(output)
}

/// Warning line for rates served from the cache, naming why the live fetch
/// failed.
pub fn stale_notice(loaded: &LoadedRates, now: DateTime<Utc>) -> Option<String> {
    match &loaded.freshness {
        Freshness::Live => None,
        Freshness::Stale { cause } => Some(format!(
            "Could not load live rates ({cause}). Showing saved rates from {}.",
            describe_age(loaded.snapshot.captured_at(), now)
        )),
    }
}

/// Loads rates and prints them; with `amount`, also the converted values.
///
/// Bad input is reported inline and the loaded rates are still shown.
pub async fn run(
    source: &dyn RateSource,
    cache: &RateCache,
    theme: Theme,
    from: &str,
    amount: Option<&str>,
) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let loaded = RateLoader::new(source, cache).load().await;
    pb.finish_and_clear();
    let loaded = loaded?;

    let from = from.trim().to_uppercase();
    let mut problems = Vec::new();

    let request = match amount.map(|input| ConversionRequest::parse(input, &from)) {
        Some(Ok(request)) => Some(request),
        Some(Err(e)) => {
            problems.push(e);
            None
        }
        None => None,
    };

    let output = match display_cards(&loaded.snapshot, &from, request.as_ref(), theme) {
        Ok(output) => output,
        Err(e) => {
            problems.push(e);
            display_cards(&loaded.snapshot, BASE_CURRENCY, None, theme)?
        }
    };

    if let Some(notice) = stale_notice(&loaded, Utc::now()) {
        println!("{}\n", ui::style_text(&notice, ui::StyleType::Notice));
    }
    for problem in &problems {
        println!("{}\n", ui::style_text(&problem.to_string(), ui::StyleType::Error));
    }
    println!("{output}");
    Ok(())
}
