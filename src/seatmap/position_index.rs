//! Индекс "x,y" → места для заливки прямоугольником.
//!
//! Индекс строится заново на каждую замену плана и никогда не
//! патчится, иначе после отката/перезагрузки в нем остаются устаревшие
//! записи. Координаты округляются до целой ячейки; в одной ячейке
//! может оказаться несколько мест, точная проверка границ делается
//! уже по исходным координатам.

use std::collections::HashMap;

use crate::models::{SeatPlan, SeatRef};

pub fn coordinate_key(x: i64, y: i64) -> String {
    format!("{},{}", x, y)
}

fn cell_of(x: f64, y: f64) -> (i64, i64) {
    (x.round() as i64, y.round() as i64)
}

/// Прямоугольник в координатах плана, границы включительно.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Rect {
    /// Ограничивающий прямоугольник двух точек.
    pub fn spanning(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            min_x: a.0.min(b.0),
            max_x: a.0.max(b.0),
            min_y: a.1.min(b.1),
            max_y: a.1.max(b.1),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    fn is_finite(&self) -> bool {
        self.min_x.is_finite() && self.max_x.is_finite() && self.min_y.is_finite() && self.max_y.is_finite()
    }

    /// Количество целых ячеек, которые задевает прямоугольник.
    fn cell_count(&self) -> f64 {
        let w = self.max_x.ceil() - self.min_x.floor() + 1.0;
        let h = self.max_y.ceil() - self.min_y.floor() + 1.0;
        w * h
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedSeat {
    seat: SeatRef,
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    cells: HashMap<String, Vec<IndexedSeat>>,
    len: usize,
}

impl PositionIndex {
    /// Места без координат (или с нечисловыми координатами) в индекс не попадают.
    pub fn build(plan: &SeatPlan) -> Self {
        let mut cells: HashMap<String, Vec<IndexedSeat>> = HashMap::new();
        let mut len = 0;

        for (seat_ref, seat) in plan.seats() {
            let Some((x, y)) = seat.position() else { continue };
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let (cx, cy) = cell_of(x, y);
            cells
                .entry(coordinate_key(cx, cy))
                .or_default()
                .push(IndexedSeat { seat: seat_ref, x, y });
            len += 1;
        }

        Self { cells, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Места в ячейке, ближайшей к точке.
    pub fn seats_at(&self, x: f64, y: f64) -> Vec<SeatRef> {
        if !x.is_finite() || !y.is_finite() {
            return Vec::new();
        }
        let (cx, cy) = cell_of(x, y);
        self.cells
            .get(&coordinate_key(cx, cy))
            .map(|entries| entries.iter().map(|e| e.seat).collect())
            .unwrap_or_default()
    }

    /// Все места внутри прямоугольника.
    ///
    /// Обычно перебираются целые ячейки прямоугольника с O(1) поиском.
    /// Если ячеек больше, чем заполненных ячеек индекса, дешевле
    /// пройти по самому индексу - результат тот же.
    pub fn within(&self, rect: &Rect) -> Vec<SeatRef> {
        if self.is_empty() || !rect.is_finite() {
            return Vec::new();
        }

        if rect.cell_count() > self.cells.len() as f64 {
            return self
                .cells
                .values()
                .flatten()
                .filter(|e| rect.contains(e.x, e.y))
                .map(|e| e.seat)
                .collect();
        }

        let mut found = Vec::new();
        let (x0, x1) = (rect.min_x.floor() as i64, rect.max_x.ceil() as i64);
        let (y0, y1) = (rect.min_y.floor() as i64, rect.max_y.ceil() as i64);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(entries) = self.cells.get(&coordinate_key(cx, cy)) {
                    found.extend(entries.iter().filter(|e| rect.contains(e.x, e.y)).map(|e| e.seat));
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Row, Seat, Section, Theater};
    use std::collections::HashSet;

    fn grid_plan(points: &[(i64, f64, f64)]) -> SeatPlan {
        let seats = points
            .iter()
            .map(|&(id, x, y)| Seat {
                id,
                seat_number: id.to_string(),
                display_number: None,
                price: None,
                status: None,
                accessible: None,
                x: Some(x),
                y: Some(y),
                attributes: None,
            })
            .collect();
        SeatPlan {
            theater: Theater { id: 1, name: "Test".into(), venue_slug: None },
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

    fn ids(refs: Vec<SeatRef>) -> HashSet<i64> {
        refs.into_iter().map(|r| r.seat_id).collect()
    }

    #[test]
    fn key_format() {
        assert_eq!(coordinate_key(-3, 12), "-3,12");
    }

    #[test]
    fn lookup_by_point() {
        let index = PositionIndex::build(&grid_plan(&[(1, 0.0, 0.0), (2, 10.2, 4.0)]));
        assert_eq!(index.len(), 2);
        assert_eq!(ids(index.seats_at(10.0, 4.0)), HashSet::from([2]));
        assert!(index.seats_at(5.0, 5.0).is_empty());
    }

    #[test]
    fn within_uses_exact_bounds() {
        let index = PositionIndex::build(&grid_plan(&[
            (1, 0.0, 0.0),
            (2, 1.0, 1.0),
            (3, 2.4, 1.0),
            (4, 2.6, 1.0),
        ]));
        let rect = Rect::spanning((0.0, 0.0), (2.5, 1.0));
        assert_eq!(ids(index.within(&rect)), HashSet::from([1, 2, 3]));
    }

    #[test]
    fn sparse_index_and_huge_rect_agree() {
        let index = PositionIndex::build(&grid_plan(&[(1, -500.0, 3.0), (2, 700.0, 900.0), (3, 5000.0, 5.0)]));
        let rect = Rect::spanning((-1000.0, 0.0), (1000.0, 1000.0));
        assert_eq!(ids(index.within(&rect)), HashSet::from([1, 2]));
    }

    #[test]
    fn seats_without_coordinates_are_not_indexed() {
        let mut plan = grid_plan(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        plan.sections[0].rows[0].seats[1].y = None;
        let index = PositionIndex::build(&plan);
        assert_eq!(index.len(), 1);
    }
}
