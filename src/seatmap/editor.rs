//! Состояние редактора схемы: текущий план, индекс позиций, ценовые
//! точки и состояние перетаскивания.
//!
//! Каждое событие указателя обрабатывается синхронно. Отсутствие плана
//! или выбранной точки - нормальное состояние во время загрузки,
//! поэтому такие события просто игнорируются.

use tracing::{debug, trace};

use crate::models::{PricePoint, SeatAttributes, SeatPlan, SeatRef};
use super::assignment::{apply_seat, apply_seats, fill_range};
use super::position_index::PositionIndex;
use super::pricing::{PricePoints, PricingError};

/// События указателя над схемой.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Нажатие над местом
    Down(SeatRef),
    /// Указатель зашел на место
    Enter(SeatRef),
    Up,
    /// Указатель ушел с контейнера схемы
    Leave,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DragState {
    anchor: Option<SeatRef>,
    dragging: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SeatMapEditor {
    seat_plan: Option<SeatPlan>,
    index: PositionIndex,
    price_points: PricePoints,
    selected: Option<String>,
    drag: DragState,
    saving: bool,
}

impl SeatMapEditor {
    pub fn new(price_points: PricePoints) -> Self {
        Self { price_points, ..Self::default() }
    }

    pub fn with_seat_plan(mut self, plan: SeatPlan) -> Self {
        self.load_seat_plan(plan);
        self
    }

    /// Заменить план целиком (загрузка, откат). Индекс перестраивается.
    pub fn load_seat_plan(&mut self, plan: SeatPlan) {
        self.drag = DragState::default();
        self.replace_plan(plan);
    }

    /// Сброс плана, например при смене зала.
    pub fn clear_seat_plan(&mut self) {
        self.seat_plan = None;
        self.index = PositionIndex::default();
        self.drag = DragState::default();
    }

    fn replace_plan(&mut self, plan: SeatPlan) {
        self.index = PositionIndex::build(&plan);
        self.seat_plan = Some(plan);
    }

    pub fn seat_plan(&self) -> Option<&SeatPlan> {
        self.seat_plan.as_ref()
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    pub fn price_points(&self) -> &PricePoints {
        &self.price_points
    }

    pub fn add_price_point(
        &mut self,
        price: f64,
        color: impl Into<String>,
        attributes: SeatAttributes,
    ) -> Result<&PricePoint, PricingError> {
        self.price_points.add(price, color, attributes)
    }

    pub fn remove_price_point(&mut self, id: &str) -> Option<PricePoint> {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.price_points.remove(id)
    }

    /// Выбрать активную точку; `None` снимает выбор.
    /// Возвращает `false`, если точки с таким id нет.
    pub fn select_price_point(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.price_points.get(id).is_some() => {
                self.selected = Some(id.to_string());
                true
            }
            Some(_) => false,
            None => {
                self.selected = None;
                true
            }
        }
    }

    pub fn selected_price_point(&self) -> Option<&PricePoint> {
        self.selected.as_deref().and_then(|id| self.price_points.get(id))
    }

    /// Пока идет внешнее сохранение, события указателя игнорируются.
    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
        if saving {
            self.drag = DragState::default();
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    pub fn anchor(&self) -> Option<SeatRef> {
        self.drag.anchor
    }

    /// Ценовая точка, которая сейчас соответствует месту.
    pub fn price_point_for(&self, target: &SeatRef) -> Option<&PricePoint> {
        let seat = self.seat_plan.as_ref()?.seat(target)?;
        self.price_points.for_seat(seat)
    }

    /// Одиночный клик: применить выбранную точку к месту.
    pub fn click_seat(&mut self, target: SeatRef) {
        let (Some(plan), Some(point)) = (self.seat_plan.as_ref(), self.selected_price_point()) else {
            return;
        };
        let updated = apply_seat(plan, &target, point);
        self.replace_plan(updated);
    }

    /// Применить выбранную точку к набору мест за один проход.
    pub fn paint_seats(&mut self, targets: &[SeatRef]) {
        let (Some(plan), Some(point)) = (self.seat_plan.as_ref(), self.selected_price_point()) else {
            return;
        };
        let updated = apply_seats(plan, targets, point);
        self.replace_plan(updated);
    }

    pub fn handle(&mut self, event: PointerEvent) {
        if self.saving {
            trace!("Ignoring {:?} while saving", event);
            return;
        }

        match event {
            PointerEvent::Down(target) => {
                if self.seat_plan.is_none() || self.selected_price_point().is_none() {
                    return;
                }
                self.drag = DragState { anchor: Some(target), dragging: true };
                self.click_seat(target);
            }
            PointerEvent::Enter(target) => {
                if !self.drag.dragging {
                    return;
                }
                let Some(anchor) = self.drag.anchor else { return };
                let (Some(plan), Some(point)) = (self.seat_plan.as_ref(), self.selected_price_point()) else {
                    return;
                };
                let positioned = plan.seat(&target).and_then(|seat| seat.position()).is_some();
                let updated = fill_range(plan, &self.index, &anchor, &target, point);
                self.replace_plan(updated);
                // прямоугольник растет шагами: якорь - последнее место с координатами
                if positioned {
                    self.drag.anchor = Some(target);
                }
            }
            PointerEvent::Up | PointerEvent::Leave => {
                if self.drag.dragging {
                    debug!("Drag finished");
                }
                self.drag = DragState::default();
            }
        }
    }

    /// План и цены для передачи в хранилище.
    pub fn into_parts(self) -> (Option<SeatPlan>, Vec<PricePoint>) {
        (self.seat_plan, self.price_points.into_vec())
    }
}
