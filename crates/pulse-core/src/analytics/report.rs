//! Profit projection from revenue and expense forecasts

use crate::models::{ForecastResult, ProfitForecast};

/// Combine two forecasts into a profit projection (revenue minus expense)
pub fn assemble_profit_forecast(revenue: &ForecastResult, expense: &ForecastResult) -> ProfitForecast {
    let mut quarter = [0.0; 3];
    for (i, slot) in quarter.iter_mut().enumerate() {
        *slot = revenue.predicted_next_quarter[i] - expense.predicted_next_quarter[i];
    }

    ProfitForecast {
        predicted_next_month_profit: revenue.predicted_next_month - expense.predicted_next_month,
        predicted_next_quarter_profit: quarter,
        revenue: revenue.clone(),
        expense: expense.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::forecast::forecast;
    use crate::models::{MonthlyPoint, YearMonth};

    fn linear(start: &str, base: f64, step: f64) -> ForecastResult {
        let mut month: YearMonth = start.parse().unwrap();
        let series: Vec<MonthlyPoint> = (0..6)
            .map(|i| {
                let point = MonthlyPoint {
                    month,
                    actual: base + step * i as f64,
                };
                month = month.succ();
                point
            })
            .collect();
        forecast(&series).unwrap()
    }

    #[test]
    fn test_profit_is_elementwise_difference() {
        let revenue = linear("2024-01", 1000.0, 100.0);
        let expense = linear("2024-01", 800.0, 50.0);
        let profit = assemble_profit_forecast(&revenue, &expense);

        assert!((profit.predicted_next_month_profit - (1600.0 - 1100.0)).abs() < 1e-6);
        for i in 0..3 {
            let expected = revenue.predicted_next_quarter[i] - expense.predicted_next_quarter[i];
            assert_eq!(profit.predicted_next_quarter_profit[i], expected);
        }
        assert_eq!(profit.revenue, revenue);
    }

    #[test]
    fn test_profit_can_be_negative() {
        let revenue = linear("2024-01", 100.0, 0.0);
        let expense = linear("2024-01", 300.0, 0.0);
        let profit = assemble_profit_forecast(&revenue, &expense);
        assert_eq!(profit.predicted_next_month_profit, -200.0);
        assert_eq!(profit.predicted_next_quarter_profit, [-200.0; 3]);
    }
}
