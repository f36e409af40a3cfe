//! Declarative descriptions of the scenes each state is built from.

use crate::camera::CameraRig;
use crate::state::AppState;
use crate::trigger::ActivateOn;
use crate::ui::{ButtonLayout, Color, HAlign, Length, VAlign};
use glam::Vec3;
use std::fmt;

/// Which scene a factory is asked to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneKind {
    /// Placeholder shown while the start menu loads at boot.
    Splash,
    StartMenu,
    Cutscene,
    Gameplay,
    LoseScreen,
}

impl SceneKind {
    /// The state this scene represents. The splash belongs to no state.
    pub fn state(self) -> Option<AppState> {
        match self {
            SceneKind::Splash => None,
            SceneKind::StartMenu => Some(AppState::Start),
            SceneKind::Cutscene => Some(AppState::Cutscene),
            SceneKind::Gameplay => Some(AppState::Game),
            SceneKind::LoseScreen => Some(AppState::Lose),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SceneKind::Splash => "splash",
            SceneKind::StartMenu => "start-menu",
            SceneKind::Cutscene => "cutscene",
            SceneKind::Gameplay => "gameplay",
            SceneKind::LoseScreen => "lose-screen",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static scene content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prop {
    /// Ambient light from `direction`.
    HemisphericLight { direction: Vec3, intensity: f32 },
    Sphere {
        center: Vec3,
        diameter: f32,
        color: Color,
    },
}

/// Camera, backdrop and props of a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Dressing {
    pub clear_color: Color,
    pub camera: CameraRig,
    pub props: Vec<Prop>,
}

impl Default for Dressing {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
            camera: CameraRig::neutral(),
            props: Vec::new(),
        }
    }
}

impl Dressing {
    /// Orbit camera with a lit unit sphere in front of it.
    fn lit_sphere(clear_color: Color) -> Self {
        Self {
            clear_color,
            camera: CameraRig::orbit(2.0),
            props: vec![
                Prop::HemisphericLight {
                    direction: Vec3::new(1.0, 1.0, 0.0),
                    intensity: 1.0,
                },
                Prop::Sphere {
                    center: Vec3::ZERO,
                    diameter: 1.0,
                    color: Color::WHITE,
                },
            ],
        }
    }
}

/// A button that requests a transition when activated.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub layout: ButtonLayout,
    pub activate_on: ActivateOn,
    pub target: AppState,
    pub text_color: Color,
}

/// Everything needed to build and furnish one scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneBlueprint {
    pub kind: SceneKind,
    pub dressing: Dressing,
    pub buttons: Vec<ButtonSpec>,
}

impl SceneBlueprint {
    pub fn splash() -> Self {
        Self {
            kind: SceneKind::Splash,
            dressing: Dressing::lit_sphere(Color::rgb(0.2, 0.2, 0.3)),
            buttons: Vec::new(),
        }
    }

    pub fn start_menu() -> Self {
        Self {
            kind: SceneKind::StartMenu,
            dressing: Dressing::default(),
            buttons: vec![ButtonSpec {
                name: "start",
                label: "PLAY",
                layout: bottom_bar(),
                activate_on: ActivateOn::PointerDown,
                target: AppState::Cutscene,
                text_color: Color::WHITE,
            }],
        }
    }

    pub fn cutscene() -> Self {
        Self {
            kind: SceneKind::Cutscene,
            dressing: Dressing::default(),
            buttons: vec![ButtonSpec {
                name: "next",
                label: "NEXT",
                layout: ButtonLayout::new(Length::Px(64.0), Length::Px(64.0))
                    .align(HAlign::Right, VAlign::Bottom)
                    .offset(Length::Fraction(-0.12), Length::Fraction(-0.03)),
                activate_on: ActivateOn::PointerUp,
                target: AppState::Game,
                text_color: Color::WHITE,
            }],
        }
    }

    /// Gameplay content. The scene itself is pre-built during the cutscene;
    /// this dressing and its buttons are applied when it is activated.
    pub fn gameplay() -> Self {
        Self {
            kind: SceneKind::Gameplay,
            dressing: Dressing::lit_sphere(Color::MIDNIGHT),
            buttons: vec![ButtonSpec {
                name: "lose",
                label: "LOSE",
                layout: bottom_bar(),
                activate_on: ActivateOn::PointerDown,
                target: AppState::Lose,
                text_color: Color::WHITE,
            }],
        }
    }

    pub fn lose_screen() -> Self {
        Self {
            kind: SceneKind::LoseScreen,
            dressing: Dressing::default(),
            buttons: vec![ButtonSpec {
                name: "mainmenu",
                label: "MAIN MENU",
                layout: ButtonLayout::new(Length::Fraction(0.1), Length::Px(40.0)),
                activate_on: ActivateOn::PointerDown,
                target: AppState::Start,
                text_color: Color::WHITE,
            }],
        }
    }

    pub fn for_state(state: AppState) -> Self {
        match state {
            AppState::Start => Self::start_menu(),
            AppState::Cutscene => Self::cutscene(),
            AppState::Game => Self::gameplay(),
            AppState::Lose => Self::lose_screen(),
        }
    }
}

fn bottom_bar() -> ButtonLayout {
    ButtonLayout::new(Length::Fraction(0.2), Length::Px(40.0))
        .align(HAlign::Center, VAlign::Bottom)
        .offset(Length::ZERO, Length::Px(-14.0))
}
