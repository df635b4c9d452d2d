//! 종가 시계열 차트 위젯.
//!
//! x축은 날짜(서기 1년 1월 1일부터의 일수), y축은 종가입니다.

use chrono::{Datelike, NaiveDate};
use findata_core::{ClosePoint, StockSymbol};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};
use rust_decimal::prelude::ToPrimitive;

/// 축 범위 (데이터가 없을 때)
const EMPTY_BOUNDS: [f64; 2] = [0.0, 1.0];
/// y축 여백 비율
const Y_PADDING_RATIO: f64 = 0.05;
/// 종가가 모두 같을 때 y축 여백 (USD)
const FLAT_Y_PADDING: f64 = 1.0;

/// 종가 선 그래프 위젯.
pub struct PriceChart<'a> {
    symbol: &'a StockSymbol,
    points: &'a [ClosePoint],
}

impl<'a> PriceChart<'a> {
    /// `points`는 날짜 오름차순이어야 합니다.
    pub fn new(symbol: &'a StockSymbol, points: &'a [ClosePoint]) -> Self {
        Self { symbol, points }
    }

    pub fn title(&self) -> String {
        format!("{} Stock Price Over Time", self.symbol)
    }

    pub fn legend(&self) -> String {
        format!("{} Closing Prices", self.symbol)
    }

    /// (일수, 종가) 좌표
    pub fn data(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (day_number(p.date), p.close_price.to_f64().unwrap_or_default()))
            .collect()
    }

    /// x축 범위: 첫 날짜 ~ 마지막 날짜
    pub fn x_bounds(&self) -> [f64; 2] {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if first.date < last.date => {
                [day_number(first.date), day_number(last.date)]
            }
            (Some(only), Some(_)) => {
                let day = day_number(only.date);
                [day - 1.0, day + 1.0]
            }
            _ => EMPTY_BOUNDS,
        }
    }

    /// y축 범위: 최저 ~ 최고 종가에 여백 추가
    pub fn y_bounds(&self) -> [f64; 2] {
        let closes = self
            .points
            .iter()
            .map(|p| p.close_price.to_f64().unwrap_or_default());

        let (min, max) = closes.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        if !min.is_finite() || !max.is_finite() {
            return EMPTY_BOUNDS;
        }

        let range = max - min;
        let pad = if range > 0.0 {
            range * Y_PADDING_RATIO
        } else {
            FLAT_Y_PADDING
        };
        [min - pad, max + pad]
    }

    /// x축 라벨: 첫 날짜, 중간 날짜, 마지막 날짜
    fn x_labels(&self) -> Vec<Span<'static>> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => {
                let mid = self.points[self.points.len() / 2].date;
                if first.date == last.date {
                    vec![Span::raw(first.date.format("%Y-%m-%d").to_string())]
                } else {
                    [first.date, mid, last.date]
                        .iter()
                        .map(|d| Span::raw(d.format("%Y-%m-%d").to_string()))
                        .collect()
                }
            }
            _ => Vec::new(),
        }
    }

    fn y_labels(&self) -> Vec<Span<'static>> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let [lower, upper] = self.y_bounds();
        let mid = (lower + upper) / 2.0;
        [lower, mid, upper]
            .iter()
            .map(|v| Span::raw(format!("{:.2}", v)))
            .collect()
    }
}

impl<'a> Widget for PriceChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let data = self.data();

        let datasets = vec![Dataset::default()
            .name(self.legend())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&data)];

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(format!(" {} ", self.title()))
                    .borders(Borders::ALL),
            )
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(self.x_bounds())
                    .labels(self.x_labels()),
            )
            .y_axis(
                Axis::default()
                    .title("Closing Price (USD)")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(self.y_bounds())
                    .labels(self.y_labels()),
            )
            .hidden_legend_constraints((Constraint::Percentage(50), Constraint::Percentage(50)));

        chart.render(area, buf);
    }
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}
