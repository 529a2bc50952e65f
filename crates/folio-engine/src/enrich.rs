//! Derived per-holding metrics.
//!
//! An [`EnrichedHolding`] is the left join of a holding with its quote plus
//! the derived metric columns. Holdings without a quote keep every
//! quote-dependent field as `None` but remain in the table, so their
//! investment still feeds downstream aggregation.

use crate::holding::Holding;
use crate::quote::Quote;
use serde::{Deserialize, Serialize};

/// Share of a gain retained after short-term capital-gains tax.
const SHORT_TERM_RETENTION: f64 = 0.75;

/// Share of a gain retained after long-term capital-gains tax.
const LONG_TERM_RETENTION: f64 = 0.85;

/// Holding periods at or above this many years qualify as long-term.
const LONG_TERM_YEARS: f64 = 1.0;

/// A holding joined with its quote and the derived metric columns.
///
/// Field renames pin the stable column names the presentation layer and the
/// export formats rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedHolding {
    /// Investment account this lot belongs to.
    #[serde(rename = "Folio")]
    pub folio: String,

    /// Ticker symbol.
    #[serde(rename = "Symbol")]
    pub symbol: String,

    /// Sector classification; the quote's value wins over the input table's.
    #[serde(rename = "Sector")]
    pub sector: Option<String>,

    /// Industry classification; the quote's value wins over the input table's.
    #[serde(rename = "Industry")]
    pub industry: Option<String>,

    /// Number of units held.
    #[serde(rename = "Quantity")]
    pub quantity: f64,

    /// Purchase price per unit.
    #[serde(rename = "Purchase Price")]
    pub purchase_price: f64,

    /// Holding period in years, floored to [`crate::HOLD_TIME_FLOOR`].
    #[serde(rename = "Hold Time")]
    pub hold_time: f64,

    /// Latest traded price, if a quote was available.
    #[serde(rename = "Current_Price")]
    pub current_price: Option<f64>,

    /// Previous session close, if a quote was available.
    #[serde(rename = "Prev_Close")]
    pub previous_close: Option<f64>,

    /// Mean analyst price target, if a quote was available.
    #[serde(rename = "Analyst_Target")]
    pub analyst_target: Option<f64>,

    /// Quantity × purchase price. Always defined.
    #[serde(rename = "Investment")]
    pub investment: f64,

    /// Quantity × current price.
    #[serde(rename = "Present_Value")]
    pub present_value: Option<f64>,

    /// Present value − investment.
    #[serde(rename = "Gain_Loss")]
    pub gain_loss: Option<f64>,

    /// Gain/loss after the tax-tier retention factor.
    #[serde(rename = "Net_Gain_Loss")]
    pub net_gain_loss: Option<f64>,

    /// Investment + net gain/loss.
    #[serde(rename = "Net_Present_Value")]
    pub net_present_value: Option<f64>,

    /// (Current price − previous close) × quantity.
    #[serde(rename = "Daily_Change")]
    pub daily_change: Option<f64>,

    /// Quantity × analyst target − investment.
    #[serde(rename = "Expect_Gain")]
    pub expect_gain: Option<f64>,

    /// Annualized net growth rate in percent, rounded to one decimal.
    #[serde(rename = "Net_CAGR")]
    pub net_cagr: Option<f64>,
}

impl EnrichedHolding {
    /// Join a holding with its quote (if any) and compute the derived fields.
    pub fn from_parts(holding: &Holding, quote: Option<&Quote>) -> Self {
        // The floor must be applied before anything divides by the hold time.
        let hold_time = holding.floored_hold_time();
        let investment = holding.investment();

        let current_price = quote.and_then(|q| q.current_price);
        let previous_close = quote.and_then(|q| q.previous_close);
        let analyst_target = quote.and_then(|q| q.analyst_target);

        let present_value = current_price.map(|price| holding.quantity * price);
        let gain_loss = present_value.map(|value| value - investment);
        let net_gain_loss = gain_loss.map(|gl| gl * tax_retention(hold_time));
        let net_present_value = net_gain_loss.map(|net| investment + net);
        let daily_change = match (current_price, previous_close) {
            (Some(current), Some(previous)) => Some((current - previous) * holding.quantity),
            _ => None,
        };
        let expect_gain = analyst_target.map(|target| holding.quantity * target - investment);
        let net_cagr =
            net_present_value.and_then(|npv| annualized_net_return(npv, investment, hold_time));

        Self {
            folio: holding.folio.clone(),
            symbol: holding.symbol.clone(),
            sector: quote
                .and_then(|q| q.sector.clone())
                .or_else(|| holding.sector.clone()),
            industry: quote
                .and_then(|q| q.industry.clone())
                .or_else(|| holding.industry.clone()),
            quantity: holding.quantity,
            purchase_price: holding.purchase_price,
            hold_time,
            current_price,
            previous_close,
            analyst_target,
            investment,
            present_value,
            gain_loss,
            net_gain_loss,
            net_present_value,
            daily_change,
            expect_gain,
            net_cagr,
        }
    }
}

/// Tax retention factor for a holding period.
///
/// Exactly one year counts as long-term; the comparison is strict.
pub(crate) fn tax_retention(hold_time: f64) -> f64 {
    if hold_time < LONG_TERM_YEARS {
        SHORT_TERM_RETENTION
    } else {
        LONG_TERM_RETENTION
    }
}

/// Annualized net growth rate in percent, rounded to one decimal place.
///
/// Undefined when nothing was invested (the ratio would divide by zero) or
/// when the value ratio is not positive (a loss beyond the invested amount
/// has no real annualization).
pub(crate) fn annualized_net_return(
    net_present_value: f64,
    investment: f64,
    hold_time: f64,
) -> Option<f64> {
    if investment <= 0.0 {
        return None;
    }
    let ratio = net_present_value / investment;
    if ratio <= 0.0 {
        return None;
    }
    Some(round_to((ratio.powf(1.0 / hold_time) - 1.0) * 100.0, 1))
}

/// Round to a fixed number of decimal places, half away from zero.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
