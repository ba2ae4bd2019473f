//! Распределение мест по ценам для графика сценария.

use serde::Serialize;

use crate::models::{PricePoint, SeatPlan};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBucket {
    pub price: f64,
    pub count: usize,
    pub total_value: f64,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDistribution {
    pub buckets: Vec<PriceBucket>,
    pub total_value: f64,
    pub total_seats: usize,
}

/// Места без цены считаются как цена 0. Цены всех ценовых точек
/// попадают в результат даже без мест.
pub fn price_distribution(plan: &SeatPlan, price_points: &[PricePoint]) -> PriceDistribution {
    let mut buckets: Vec<PriceBucket> = Vec::new();

    let mut bump = |price: f64, by: usize| {
        // -0.0 и 0.0 - одна корзина
        let price = if price == 0.0 { 0.0 } else { price };
        match buckets.iter_mut().find(|b| b.price == price) {
            Some(bucket) => bucket.count += by,
            None => buckets.push(PriceBucket { price, count: by, total_value: 0.0, color: None }),
        }
    };

    for (_, seat) in plan.seats() {
        bump(seat.price.unwrap_or(0.0), 1);
    }
    for point in price_points {
        bump(point.price, 0);
    }

    for bucket in buckets.iter_mut() {
        bucket.total_value = bucket.price * bucket.count as f64;
        bucket.color = price_points
            .iter()
            .find(|p| p.price == bucket.price)
            .map(|p| p.color.clone());
    }
    buckets.sort_by(|a, b| a.price.total_cmp(&b.price));

    PriceDistribution {
        total_value: buckets.iter().map(|b| b.total_value).sum(),
        total_seats: buckets.iter().map(|b| b.count).sum(),
        buckets,
    }
}

/// `$1.2M`, `$3.4K`, `$56`.
pub fn format_currency(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Row, Seat, SeatAttributes, Section, Theater};

    fn plan(prices: &[Option<f64>]) -> SeatPlan {
        let seats = prices
            .iter()
            .enumerate()
            .map(|(i, price)| Seat {
                id: i as i64,
                seat_number: i.to_string(),
                display_number: None,
                price: *price,
                status: None,
                accessible: None,
                x: None,
                y: None,
                attributes: None,
            })
            .collect();
        SeatPlan {
            theater: Theater { id: 1, name: "T".into(), venue_slug: None },
            sections: vec![Section {
                id: 1,
                name: "ORCHESTRA".into(),
                label: "Orchestra".into(),
                category_key: None,
                color: None,
                parent_section: None,
                rows: vec![Row { id: 1, label: "A".into(), display_label: None, section_id: 1, seats }],
            }],
        }
    }

    #[test]
    fn counts_seats_per_price() {
        let points = vec![
            PricePoint { id: "a".into(), price: 50.0, color: "#111".into(), attributes: SeatAttributes::default() },
            PricePoint { id: "b".into(), price: 200.0, color: "#222".into(), attributes: SeatAttributes::default() },
        ];
        let dist = price_distribution(&plan(&[Some(50.0), None, Some(50.0), Some(75.0)]), &points);

        let summary: Vec<_> = dist.buckets.iter().map(|b| (b.price, b.count, b.total_value)).collect();
        assert_eq!(summary, vec![(0.0, 1, 0.0), (50.0, 2, 100.0), (75.0, 1, 75.0), (200.0, 0, 0.0)]);
        assert_eq!(dist.buckets[1].color.as_deref(), Some("#111"));
        assert_eq!(dist.buckets[2].color, None);
        assert_eq!(dist.total_value, 175.0);
        assert_eq!(dist.total_seats, 4);
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(56.0), "$56");
        assert_eq!(format_currency(3_460.0), "$3.5K");
        assert_eq!(format_currency(1_200_000.0), "$1.2M");
    }
}
