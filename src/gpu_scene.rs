//! Scene resource drawn with the overlay renderer.

use crate::error::SceneError;
use crate::overlay::ShapeBatch;
use crate::scene::{
    ButtonSpec, Dressing, Prop, ReadyFuture, SceneFactory, SceneKind, SceneResource,
};
use crate::trigger::{ActivateOn, Trigger};
use crate::ui::{Color, Rect};
use futures::FutureExt;
use futures::future;
use glam::Vec2;
use std::cell::{Cell, RefCell};

/// Ambient term applied to spheres, lit or not.
const AMBIENT: f32 = 0.35;

/// A [`SceneResource`] drawn through the [`Overlay`](crate::Overlay).
///
/// Spheres are projected with the dressing's camera and drawn as shaded
/// discs; buttons are laid out against the ideal UI height and hit-tested
/// with [`GpuScene::pointer`]. All state is CPU-side, so readiness resolves
/// on the first poll.
pub struct GpuScene {
    kind: SceneKind,
    ideal_height: f32,
    dressing: RefCell<Dressing>,
    buttons: RefCell<Vec<(ButtonSpec, Trigger)>>,
    input: Cell<bool>,
    disposed: Cell<bool>,
}

impl GpuScene {
    /// Create an empty scene of `kind`, with a default dressing and no
    /// buttons. Input starts detached.
    pub fn new(kind: SceneKind, ideal_height: f32) -> Self {
        Self {
            kind,
            ideal_height,
            dressing: RefCell::new(Dressing::default()),
            buttons: RefCell::new(Vec::new()),
            input: Cell::new(false),
            disposed: Cell::new(false),
        }
    }

    /// Background color the frame is cleared with.
    pub fn clear_color(&self) -> Color {
        self.dressing.borrow().clear_color
    }

    /// Screen rectangles of the scene's buttons.
    pub fn button_rects(&self, viewport: Vec2) -> Vec<(&'static str, Rect)> {
        self.buttons
            .borrow()
            .iter()
            .map(|(spec, _)| (spec.name, spec.layout.resolve(viewport, self.ideal_height)))
            .collect()
    }

    /// Queue the scene's props and buttons.
    pub fn draw(&self, batch: &mut ShapeBatch, viewport: Vec2) {
        let dressing = self.dressing.borrow();
        let light = dressing
            .props
            .iter()
            .map(|prop| match prop {
                Prop::HemisphericLight { intensity, .. } => *intensity,
                Prop::Sphere { .. } => 0.0,
            })
            .sum::<f32>();

        for prop in &dressing.props {
            let Prop::Sphere {
                center,
                diameter,
                color,
            } = *prop
            else {
                continue;
            };
            let radius = diameter * 0.5;
            let (Some(at), Some(size)) = (
                dressing.camera.project(center, viewport),
                dressing.camera.apparent_radius(center, radius, viewport),
            ) else {
                continue;
            };
            let shade = (AMBIENT + light * (1.0 - AMBIENT)).min(1.0);
            batch.disc(at, size, color.scaled(shade));
            batch.disc(
                at + Vec2::new(-0.3, -0.3) * size,
                size * 0.25,
                color.scaled((shade + 0.2).min(1.0)),
            );
        }

        for (spec, _) in self.buttons.borrow().iter() {
            let rect = spec.layout.resolve(viewport, self.ideal_height);
            batch.rect(rect, Color::BUTTON_BG);
            let underline = (rect.height * 0.08).max(1.0);
            batch.rect(
                Rect::new(
                    rect.x + rect.width * 0.2,
                    rect.y + rect.height * 0.5 - underline * 0.5,
                    rect.width * 0.6,
                    underline,
                ),
                spec.text_color,
            );
        }
    }

    /// Route a pointer edge at `position` to the buttons.
    ///
    /// Returns true if a trigger fired.
    pub fn pointer(&self, edge: ActivateOn, position: Vec2, viewport: Vec2) -> bool {
        if !self.input.get() || self.disposed.get() {
            return false;
        }
        // fire outside the borrow
        let hit = self
            .buttons
            .borrow()
            .iter()
            .find(|(spec, _)| {
                spec.activate_on == edge
                    && spec
                        .layout
                        .resolve(viewport, self.ideal_height)
                        .contains(position)
            })
            .map(|(_, trigger)| trigger.clone());
        hit.is_some_and(|trigger| trigger.fire())
    }
}

impl SceneResource for GpuScene {
    fn kind(&self) -> SceneKind {
        self.kind
    }

    fn when_ready(&self) -> ReadyFuture {
        let outcome = if self.disposed.get() {
            Err(SceneError::Disposed)
        } else {
            Ok(())
        };
        future::ready(outcome).boxed_local()
    }

    fn dress(&self, dressing: &Dressing) {
        *self.dressing.borrow_mut() = dressing.clone();
    }

    fn on_activate(&self, button: ButtonSpec, trigger: Trigger) {
        log::debug!("{} scene: button '{}' registered", self.kind, button.name);
        self.buttons.borrow_mut().push((button, trigger));
    }

    fn attach_input(&self) {
        self.input.set(true);
    }

    fn detach_input(&self) {
        self.input.set(false);
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            log::warn!("{} scene disposed twice", self.kind);
            return;
        }
        self.input.set(false);
        self.buttons.borrow_mut().clear();
        self.dressing.borrow_mut().props.clear();
    }
}

/// Builds [`GpuScene`]s whose buttons are laid out against `ideal_height`.
pub struct GpuSceneFactory {
    ideal_height: f32,
}

impl GpuSceneFactory {
    /// Create a factory laying out buttons for a viewport `ideal_height`
    /// pixels tall. Non-positive heights make every construction fail.
    pub fn new(ideal_height: f32) -> Self {
        Self { ideal_height }
    }
}

impl SceneFactory for GpuSceneFactory {
    type Scene = GpuScene;

    fn construct(&self, kind: SceneKind) -> Result<GpuScene, SceneError> {
        if self.ideal_height.is_nan() || self.ideal_height <= 0.0 {
            return Err(SceneError::Construction(format!(
                "ideal UI height must be positive, got {}",
                self.ideal_height
            )));
        }
        Ok(GpuScene::new(kind, self.ideal_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBlueprint;
    use crate::state::AppState;
    use crate::trigger::InputGate;
    use futures::executor::block_on;
    use std::rc::Rc;

    const VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    fn furnished(blueprint: SceneBlueprint) -> (GpuScene, Rc<Cell<Vec<AppState>>>) {
        let scene = GpuSceneFactory::new(720.0).construct(blueprint.kind).unwrap();
        scene.dress(&blueprint.dressing);
        let fired = Rc::new(Cell::new(Vec::new()));
        let gate = InputGate::new();
        gate.open();
        for button in blueprint.buttons {
            let fired = Rc::clone(&fired);
            let trigger = Trigger::new(button.label, button.target, gate.clone(), move |target| {
                let mut seen = fired.take();
                seen.push(target);
                fired.set(seen);
            });
            scene.on_activate(button, trigger);
        }
        scene.attach_input();
        (scene, fired)
    }

    #[test]
    fn readiness_is_immediate() {
        let scene = GpuScene::new(SceneKind::StartMenu, 720.0);
        assert_eq!(block_on(scene.when_ready()), Ok(()));
        scene.dispose();
        assert_eq!(block_on(scene.when_ready()), Err(SceneError::Disposed));
    }

    #[test]
    fn factory_rejects_a_degenerate_ui_height() {
        let result = GpuSceneFactory::new(0.0).construct(SceneKind::StartMenu);
        assert!(matches!(result, Err(SceneError::Construction(_))));
    }

    #[test]
    fn click_on_play_fires_on_press() {
        let (scene, fired) = furnished(SceneBlueprint::start_menu());
        let play = scene.button_rects(VIEWPORT)[0].1;

        assert!(!scene.pointer(ActivateOn::PointerUp, play.center(), VIEWPORT));
        assert!(scene.pointer(ActivateOn::PointerDown, play.center(), VIEWPORT));
        assert_eq!(fired.take(), vec![AppState::Cutscene]);
    }

    #[test]
    fn next_fires_on_release_only() {
        let (scene, fired) = furnished(SceneBlueprint::cutscene());
        let next = scene.button_rects(VIEWPORT)[0].1;

        assert!(!scene.pointer(ActivateOn::PointerDown, next.center(), VIEWPORT));
        assert!(scene.pointer(ActivateOn::PointerUp, next.center(), VIEWPORT));
        assert_eq!(fired.take(), vec![AppState::Game]);
    }

    #[test]
    fn misses_and_detached_input_do_nothing() {
        let (scene, fired) = furnished(SceneBlueprint::start_menu());
        let play = scene.button_rects(VIEWPORT)[0].1;

        assert!(!scene.pointer(ActivateOn::PointerDown, Vec2::new(5.0, 5.0), VIEWPORT));
        scene.detach_input();
        assert!(!scene.pointer(ActivateOn::PointerDown, play.center(), VIEWPORT));
        assert!(fired.take().is_empty());
    }

    #[test]
    fn gameplay_draws_its_sphere_and_button() {
        let (scene, _) = furnished(SceneBlueprint::gameplay());
        let mut batch = ShapeBatch::default();

        scene.draw(&mut batch, VIEWPORT);

        assert_eq!(scene.clear_color(), Color::MIDNIGHT);
        let sphere_center = [VIEWPORT.x * 0.5, VIEWPORT.y * 0.5];
        assert!(batch.vertices().iter().any(|v| {
            (v.position[0] - sphere_center[0]).abs() < 1.0
                && (v.position[1] - sphere_center[1]).abs() < 1.0
        }));
        // two discs plus a button background and underline
        assert!(batch.vertices().len() > 12);
    }

    #[test]
    fn disposed_scene_draws_nothing() {
        let (scene, _) = furnished(SceneBlueprint::gameplay());
        scene.detach_input();
        scene.dispose();

        let mut batch = ShapeBatch::default();
        scene.draw(&mut batch, VIEWPORT);

        assert!(batch.is_empty());
        assert!(scene.button_rects(VIEWPORT).is_empty());
    }
}
