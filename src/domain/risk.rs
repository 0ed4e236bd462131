//! Stand-alone risk statistics over a daily return series, plus portfolio-level checks.

use serde::Serialize;
use std::fmt::Write as _;

use super::error::StratlabError;
use super::metrics::{
    TRADING_DAYS_PER_YEAR, max_drawdown, mean, population_stddev, sharpe_ratio, sortino_ratio,
};

const VAR_TAIL: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskMetrics {
    pub sharpe_ratio: f64,
    /// Fraction of the running peak of the compounded return index.
    pub max_drawdown: f64,
    pub volatility: f64,
    pub beta: f64,
    pub alpha: f64,
    pub value_at_risk: f64,
    pub expected_shortfall: f64,
    pub calmar_ratio: f64,
    pub sortino_ratio: f64,
}

impl RiskMetrics {
    /// Compute every statistic from `returns`.
    ///
    /// Beta and alpha need a benchmark series of the same length with non-zero variance;
    /// otherwise they fall back to 1 and 0.
    pub fn from_returns(
        returns: &[f64],
        benchmark: Option<&[f64]>,
        risk_free_rate: f64,
    ) -> Result<Self, StratlabError> {
        if returns.is_empty() {
            return Err(StratlabError::InsufficientData {
                context: "risk metrics".to_string(),
                bars: 0,
                minimum: 1,
            });
        }

        let avg = mean(returns);
        let volatility = population_stddev(returns) * TRADING_DAYS_PER_YEAR.sqrt();

        let max_drawdown = max_drawdown(&compound_index(returns));

        let (beta, alpha) = match benchmark {
            Some(bench) => beta_alpha(returns, bench),
            None => (1.0, 0.0),
        };

        let (value_at_risk, expected_shortfall) = tail_risk(returns);

        let calmar_ratio = if max_drawdown > 0.0 {
            avg * TRADING_DAYS_PER_YEAR / max_drawdown
        } else {
            0.0
        };

        Ok(RiskMetrics {
            sharpe_ratio: sharpe_ratio(returns, risk_free_rate),
            max_drawdown,
            volatility,
            beta,
            alpha,
            value_at_risk,
            expected_shortfall,
            calmar_ratio,
            sortino_ratio: sortino_ratio(returns, risk_free_rate),
        })
    }
}

/// Growth of one unit of capital, starting with the unit itself.
pub fn compound_index(returns: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(returns.len() + 1);
    let mut level = 1.0;
    out.push(level);
    for r in returns {
        level *= 1.0 + r;
        out.push(level);
    }
    out
}

pub fn beta_alpha(returns: &[f64], benchmark: &[f64]) -> (f64, f64) {
    if returns.len() != benchmark.len() || returns.is_empty() {
        return (1.0, 0.0);
    }
    let avg = mean(returns);
    let bench_avg = mean(benchmark);
    let n = returns.len() as f64;
    let covariance = returns
        .iter()
        .zip(benchmark)
        .map(|(r, b)| (r - avg) * (b - bench_avg))
        .sum::<f64>()
        / n;
    let bench_stddev = population_stddev(benchmark);
    if bench_stddev == 0.0 {
        return (1.0, 0.0);
    }
    let bench_variance = bench_stddev * bench_stddev;
    let beta = covariance / bench_variance;
    (beta, avg - beta * bench_avg)
}

/// Historical 95% VaR (nearest rank) and the mean of the tail at or below it.
pub fn tail_risk(returns: &[f64]) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = (sorted.len() as f64 * VAR_TAIL).floor() as usize;
    let var = sorted[idx].abs();
    let es = mean(&sorted[..=idx]).abs();
    (var, es)
}

/// One open position for portfolio-level assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: String,
    pub quantity: u64,
    pub entry_price: f64,
    pub current_price: f64,
}

impl Holding {
    pub fn market_value(&self) -> f64 {
        self.quantity as f64 * self.current_price
    }

    pub fn unrealized_pnl(&self) -> f64 {
        self.quantity as f64 * (self.current_price - self.entry_price)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRiskAssessment {
    pub total_risk: f64,
    pub diversification_score: f64,
    pub concentration_risk: f64,
    pub recommendations: Vec<String>,
}

const CONCENTRATION_LIMIT: f64 = 0.10;
const TARGET_POSITIONS: f64 = 10.0;
const ELEVATED_RISK: f64 = 0.05;

pub fn assess_portfolio_risk(holdings: &[Holding]) -> Result<PortfolioRiskAssessment, StratlabError> {
    let total_value: f64 = holdings.iter().map(Holding::market_value).sum();
    if holdings.is_empty() || total_value <= 0.0 {
        return Err(StratlabError::configuration(
            "portfolio assessment needs at least one position with positive value",
        ));
    }

    let mut recommendations = Vec::new();

    let max_weight = holdings
        .iter()
        .map(|h| h.market_value() / total_value)
        .fold(0.0_f64, f64::max);
    let concentration_risk = if max_weight > CONCENTRATION_LIMIT {
        max_weight
    } else {
        0.0
    };
    if concentration_risk > 0.0 {
        recommendations.push(format!(
            "High concentration risk: {:.1}% in single position",
            concentration_risk * 100.0
        ));
    }

    let diversification_score = (holdings.len() as f64 / TARGET_POSITIONS).min(1.0);
    if diversification_score < 0.5 {
        recommendations.push("Consider adding more positions for better diversification".to_string());
    }

    let unrealized: f64 = holdings.iter().map(Holding::unrealized_pnl).sum();
    let total_risk = unrealized.abs() / total_value;
    if total_risk > ELEVATED_RISK {
        recommendations
            .push("Portfolio risk is elevated - consider reducing position sizes".to_string());
    }

    Ok(PortfolioRiskAssessment {
        total_risk,
        diversification_score,
        concentration_risk,
        recommendations,
    })
}

/// Plain-text summary of `metrics` with threshold verdicts.
pub fn risk_report(metrics: &RiskMetrics) -> String {
    let verdict = |ok: bool, good: &str, bad: &str| {
        if ok {
            format!("[OK]   {good}")
        } else {
            format!("[WARN] {bad}")
        }
    };

    let mut out = String::new();
    let _ = writeln!(out, "Risk Management Report");
    let _ = writeln!(out, "======================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Portfolio Performance:");
    let _ = writeln!(out, "- Sharpe Ratio: {:.2}", metrics.sharpe_ratio);
    let _ = writeln!(out, "- Sortino Ratio: {:.2}", metrics.sortino_ratio);
    let _ = writeln!(out, "- Calmar Ratio: {:.2}", metrics.calmar_ratio);
    let _ = writeln!(out, "- Maximum Drawdown: {:.2}%", metrics.max_drawdown * 100.0);
    let _ = writeln!(out, "- Volatility: {:.2}%", metrics.volatility * 100.0);
    let _ = writeln!(out, "- Value at Risk (95%): {:.2}%", metrics.value_at_risk * 100.0);
    let _ = writeln!(
        out,
        "- Expected Shortfall: {:.2}%",
        metrics.expected_shortfall * 100.0
    );
    let _ = writeln!(out, "- Beta: {:.2}  Alpha: {:.4}", metrics.beta, metrics.alpha);
    let _ = writeln!(out);
    let _ = writeln!(out, "Risk Assessment:");
    let _ = writeln!(
        out,
        "{}",
        verdict(
            metrics.sharpe_ratio > 1.0,
            "Good risk-adjusted returns",
            "Poor risk-adjusted returns"
        )
    );
    let _ = writeln!(
        out,
        "{}",
        verdict(
            metrics.max_drawdown < 0.1,
            "Acceptable drawdown",
            "High drawdown risk"
        )
    );
    let _ = write!(
        out,
        "{}",
        verdict(metrics.volatility < 0.2, "Low volatility", "High volatility")
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn holding(symbol: &str, quantity: u64, entry: f64, current: f64) -> Holding {
        Holding {
            symbol: symbol.to_string(),
            quantity,
            entry_price: entry,
            current_price: current,
        }
    }

    #[test]
    fn empty_returns_are_rejected() {
        assert!(matches!(
            RiskMetrics::from_returns(&[], None, 0.02),
            Err(StratlabError::InsufficientData { .. })
        ));
    }

    #[test]
    fn var_is_nearest_rank() {
        // 20 returns: idx = floor(20 * 0.05) = 1, the second-worst.
        let mut returns: Vec<f64> = (0..18).map(|i| 0.001 * i as f64).collect();
        returns.push(-0.05);
        returns.push(-0.03);
        let (var, es) = tail_risk(&returns);
        assert_relative_eq!(var, 0.03, epsilon = 1e-12);
        assert_relative_eq!(es, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn short_series_var_uses_worst_return() {
        let (var, es) = tail_risk(&[0.01, -0.02, 0.005]);
        assert_relative_eq!(var, 0.02, epsilon = 1e-12);
        assert_relative_eq!(es, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn beta_fallback_on_length_mismatch() {
        let m = RiskMetrics::from_returns(&[0.01, 0.02], Some(&[0.01]), 0.02).unwrap();
        assert_eq!(m.beta, 1.0);
        assert_eq!(m.alpha, 0.0);
    }

    #[test]
    fn beta_fallback_on_flat_benchmark() {
        assert_eq!(beta_alpha(&[0.01, 0.02], &[0.01, 0.01]), (1.0, 0.0));
    }

    #[test]
    fn beta_of_scaled_series() {
        let bench = [0.01, -0.02, 0.015, 0.0];
        let returns: Vec<f64> = bench.iter().map(|b| 2.0 * b).collect();
        let (beta, alpha) = beta_alpha(&returns, &bench);
        assert_relative_eq!(beta, 2.0, epsilon = 1e-9);
        assert_relative_eq!(alpha, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_includes_first_loss() {
        let m = RiskMetrics::from_returns(&[-0.1, 0.05], None, 0.02).unwrap();
        assert_relative_eq!(m.max_drawdown, 0.1, epsilon = 1e-12);
        assert!(m.calmar_ratio < 0.0);
    }

    #[test]
    fn constant_benchmark_falls_back_to_unit_beta() {
        let (beta, alpha) = beta_alpha(&[0.01, -0.02, 0.005], &[0.001; 3]);
        assert_eq!((beta, alpha), (1.0, 0.0));
    }

    #[test]
    fn constant_returns_have_zero_ratios() {
        let m = RiskMetrics::from_returns(&[0.001; 10], None, 0.02).unwrap();
        assert_eq!(m.sharpe_ratio, 0.0);
        assert_eq!(m.sortino_ratio, 0.0);
        assert_eq!(m.calmar_ratio, 0.0);
        assert_eq!(m.volatility, 0.0);
    }

    #[test]
    fn concentrated_portfolio() {
        let a = assess_portfolio_risk(&[
            holding("AAA", 100, 10.0, 10.0),
            holding("BBB", 10, 10.0, 10.0),
        ])
        .unwrap();
        assert_relative_eq!(a.concentration_risk, 1000.0 / 1100.0, epsilon = 1e-12);
        assert_relative_eq!(a.diversification_score, 0.2, epsilon = 1e-12);
        assert_eq!(a.total_risk, 0.0);
        assert_eq!(a.recommendations.len(), 2);
    }

    #[test]
    fn elevated_risk_is_flagged() {
        let holdings: Vec<Holding> = (0..10)
            .map(|i| holding(&format!("S{i}"), 10, 10.0, 12.0))
            .collect();
        let a = assess_portfolio_risk(&holdings).unwrap();
        assert_eq!(a.concentration_risk, 0.0);
        assert_eq!(a.diversification_score, 1.0);
        assert_relative_eq!(a.total_risk, 200.0 / 1200.0, epsilon = 1e-12);
        assert_eq!(
            a.recommendations,
            vec!["Portfolio risk is elevated - consider reducing position sizes".to_string()]
        );
    }

    #[test]
    fn empty_portfolio_is_rejected() {
        assert!(assess_portfolio_risk(&[]).unwrap_err().is_configuration());
    }

    #[test]
    fn report_contains_verdicts() {
        let m = RiskMetrics {
            sharpe_ratio: 1.5,
            max_drawdown: 0.25,
            volatility: 0.15,
            beta: 1.0,
            alpha: 0.0,
            value_at_risk: 0.02,
            expected_shortfall: 0.03,
            calmar_ratio: 0.8,
            sortino_ratio: 2.0,
        };
        let text = risk_report(&m);
        assert!(text.contains("Sharpe Ratio: 1.50"));
        assert!(text.contains("Maximum Drawdown: 25.00%"));
        assert!(text.contains("[OK]   Good risk-adjusted returns"));
        assert!(text.contains("[WARN] High drawdown risk"));
        assert!(text.contains("[OK]   Low volatility"));
    }
}
