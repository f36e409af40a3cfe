//! The transition controller: moves the application from one scene to the
//! next.
//!
//! Every transition follows the same two-phase protocol:
//!
//! 1. **Stage**: input on the active scene is suspended, the loading
//!    indicator is shown, the target scene is constructed, dressed, given its
//!    triggers and awaited until ready. The active scene keeps being drawn.
//! 2. **Commit**: in one synchronous step the staged scene becomes active,
//!    the previous one is disposed and the state registry is updated.
//!
//! If staging fails, the staged scene is disposed, the previous scene gets
//! its input back and the error is returned. Nothing is retried.
//!
//! Transitions run as tasks on a `futures` [`LocalSpawner`]; triggers spawn
//! them, tests may also await the operations directly.

use crate::error::{SceneError, TransitionError};
use crate::scene::{
    Prefetch, SceneBlueprint, SceneContext, SceneFactory, SceneKind, SceneResource, StagedScene,
};
use crate::state::AppState;
use crate::surface::{LoadingIndicator, LoadingScope};
use crate::trigger::{InputGate, Trigger};
use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Result<T> = std::result::Result<T, TransitionError>;

/// Marks a transition as in flight until dropped.
struct Flight<'a> {
    slot: &'a Cell<Option<AppState>>,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.slot.set(None);
    }
}

/// Drives the `Start → Cutscene → Game → Lose → Start` cycle.
///
/// The controller is the only writer of its [`SceneContext`] and of the
/// pending gameplay pre-fetch. It is always used behind an `Rc` so the
/// triggers it hands out can reach it again.
pub struct TransitionController<F: SceneFactory> {
    context: Rc<SceneContext<F::Scene>>,
    factory: F,
    loading: Rc<dyn LoadingIndicator>,
    spawner: LocalSpawner,
    pending_game: RefCell<Option<Prefetch<F::Scene>>>,
    in_flight: Cell<Option<AppState>>,
    launched: Cell<bool>,
}

impl<F: SceneFactory + 'static> TransitionController<F> {
    /// Create a controller over `context`.
    ///
    /// Scenes are built by `factory`, `loading` is shown while a scene is
    /// staged, and transitions requested by triggers are spawned on
    /// `spawner`. Nothing is shown until [`TransitionController::launch`]
    /// runs.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::rc::Rc;
    /// use futures::executor::LocalPool;
    /// use stagehand::{GpuSceneFactory, LoadingFlag, SceneContext, TransitionController};
    ///
    /// let mut pool = LocalPool::new();
    /// let controller = TransitionController::new(
    ///     Rc::new(SceneContext::new()),
    ///     GpuSceneFactory::new(720.0),
    ///     Rc::new(LoadingFlag::new()),
    ///     pool.spawner(),
    /// );
    /// pool.run_until(controller.launch()).unwrap();
    /// ```
    pub fn new(
        context: Rc<SceneContext<F::Scene>>,
        factory: F,
        loading: Rc<dyn LoadingIndicator>,
        spawner: LocalSpawner,
    ) -> Rc<Self> {
        Rc::new(Self {
            context,
            factory,
            loading,
            spawner,
            pending_game: RefCell::new(None),
            in_flight: Cell::new(None),
            launched: Cell::new(false),
        })
    }

    /// The context holding the active scene, shared with the render driver.
    pub fn context(&self) -> &Rc<SceneContext<F::Scene>> {
        &self.context
    }

    /// The factory scenes are built with.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// The state of the active scene. `Start` until the first commit.
    pub fn current(&self) -> AppState {
        self.context.current()
    }

    /// The target of the transition currently being staged, if any.
    pub fn in_flight(&self) -> Option<AppState> {
        self.in_flight.get()
    }

    /// Returns true while a gameplay scene is pre-fetched and not yet used.
    pub fn has_pending_game(&self) -> bool {
        self.pending_game.borrow().is_some()
    }

    /// Bring up the first scenes: the boot splash, then the start menu.
    ///
    /// Fails as an ignored [`TransitionError::InvalidStateTransition`] once
    /// the start menu has been entered. If the start menu fails to build, the
    /// splash stays up and `launch` may be called again; the retry stages the
    /// start menu over the splash.
    pub async fn launch(self: &Rc<Self>) -> Result<()> {
        self.ensure_idle(AppState::Start)?;
        if self.launched.get() {
            return Err(TransitionError::InvalidStateTransition {
                from: self.current(),
                to: AppState::Start,
            });
        }
        let _flight = self.claim(AppState::Start);

        if !self.context.has_active() {
            let splash = self.stage(SceneBlueprint::splash(), AppState::Start).await?;
            self.context.commit(splash);
        }

        self.enter(SceneBlueprint::start_menu()).await?;
        self.launched.set(true);
        Ok(())
    }

    /// Returns true once [`TransitionController::launch`] has entered the
    /// start menu.
    pub fn is_launched(&self) -> bool {
        self.launched.get()
    }

    /// Move to `target` through the operation for that state.
    pub async fn transition_to(self: &Rc<Self>, target: AppState) -> Result<()> {
        match target {
            AppState::Start => self.to_start().await,
            AppState::Cutscene => self.to_cutscene().await,
            AppState::Game => self.to_game().await,
            AppState::Lose => self.to_lose().await,
        }
    }

    /// Return to the start menu from the lose screen.
    pub async fn to_start(self: &Rc<Self>) -> Result<()> {
        let _flight = self.begin(AppState::Start)?;
        self.enter(SceneBlueprint::start_menu()).await
    }

    /// Show the cutscene, then start pre-fetching gameplay in the background.
    pub async fn to_cutscene(self: &Rc<Self>) -> Result<()> {
        let _flight = self.begin(AppState::Cutscene)?;
        self.enter(SceneBlueprint::cutscene()).await?;
        self.prefetch_game();
        Ok(())
    }

    /// Activate the pre-fetched gameplay scene, waiting for it if needed.
    pub async fn to_game(self: &Rc<Self>) -> Result<()> {
        let _flight = self.begin(AppState::Game)?;
        let prefetch = self.prefetch_game();

        self.context.suspend_input();
        let loaded = {
            let _loading = (!prefetch.is_settled())
                .then(|| LoadingScope::new(&*self.loading));
            prefetch.scene().await
        };
        self.pending_game.borrow_mut().take();

        let scene = match loaded {
            Ok(scene) => scene,
            Err(source) => {
                self.context.resume_input();
                return Err(TransitionError::ConstructionFailure {
                    target: AppState::Game,
                    source,
                });
            }
        };

        let staged = StagedScene::new(scene, Some(AppState::Game));
        self.furnish(&staged, &SceneBlueprint::gameplay());
        self.context.commit(staged);
        Ok(())
    }

    /// Leave gameplay for the lose screen.
    ///
    /// If the lose screen fails to load, gameplay stays active and
    /// interactive.
    pub async fn to_lose(self: &Rc<Self>) -> Result<()> {
        let _flight = self.begin(AppState::Lose)?;
        self.enter(SceneBlueprint::lose_screen()).await
    }

    fn ensure_idle(&self, requested: AppState) -> Result<()> {
        match self.in_flight.get() {
            Some(in_flight) => Err(TransitionError::DoubleTransitionRequest {
                requested,
                in_flight,
            }),
            None => Ok(()),
        }
    }

    fn claim(&self, target: AppState) -> Flight<'_> {
        self.in_flight.set(Some(target));
        Flight {
            slot: &self.in_flight,
        }
    }

    fn begin(&self, target: AppState) -> Result<Flight<'_>> {
        self.ensure_idle(target)?;
        let from = self.current();
        if !from.can_advance_to(target) {
            return Err(TransitionError::InvalidStateTransition { from, to: target });
        }
        log::debug!("transition {from} -> {target} started");
        Ok(self.claim(target))
    }

    async fn enter(self: &Rc<Self>, blueprint: SceneBlueprint) -> Result<()> {
        let target = blueprint.kind.state().unwrap_or_default();
        let staged = self.stage(blueprint, target).await?;
        self.context.commit(staged);
        Ok(())
    }

    /// Build and await the scene for `blueprint` without activating it.
    ///
    /// `target` only names the state in a returned error.
    async fn stage(
        self: &Rc<Self>,
        blueprint: SceneBlueprint,
        target: AppState,
    ) -> Result<StagedScene<F::Scene>> {
        self.context.suspend_input();
        let staged = self.build(blueprint).await;
        if staged.is_err() {
            self.context.resume_input();
        }
        staged.map_err(|source| {
            log::error!("could not enter {target}: {source}");
            TransitionError::ConstructionFailure { target, source }
        })
    }

    async fn build(
        self: &Rc<Self>,
        blueprint: SceneBlueprint,
    ) -> std::result::Result<StagedScene<F::Scene>, SceneError> {
        let _loading = LoadingScope::new(&*self.loading);

        let scene = Rc::new(self.factory.construct(blueprint.kind)?);
        let staged = StagedScene::new(scene, blueprint.kind.state());
        self.furnish(&staged, &blueprint);

        match staged.scene().when_ready().await {
            Ok(()) => Ok(staged),
            Err(err) => {
                staged.abandon();
                Err(err)
            }
        }
    }

    fn furnish(self: &Rc<Self>, staged: &StagedScene<F::Scene>, blueprint: &SceneBlueprint) {
        let scene = staged.scene();
        scene.dress(&blueprint.dressing);
        for button in &blueprint.buttons {
            let trigger = self.trigger(button.label, button.target, staged.gate().clone());
            scene.on_activate(button.clone(), trigger);
        }
    }

    /// The gameplay pre-fetch, started on first use.
    fn prefetch_game(&self) -> Prefetch<F::Scene> {
        let mut pending = self.pending_game.borrow_mut();
        if let Some(prefetch) = pending.as_ref() {
            return prefetch.clone();
        }

        let prefetch = Prefetch::start(&self.factory, SceneKind::Gameplay);
        if let Err(err) = self.spawner.spawn_local(prefetch.settle()) {
            log::warn!("gameplay will load on demand, background load not scheduled: {err}");
        }
        *pending = Some(prefetch.clone());
        prefetch
    }

    /// A trigger that schedules a transition to `target` on the spawner.
    fn trigger(self: &Rc<Self>, label: &str, target: AppState, gate: InputGate) -> Trigger {
        let controller = Rc::downgrade(self);
        let spawner = self.spawner.clone();

        Trigger::new(label, target, gate, move |target| {
            let Some(controller) = controller.upgrade() else {
                return;
            };
            let request = async move {
                match controller.transition_to(target).await {
                    Ok(()) => {}
                    Err(err) if err.is_ignored() => log::debug!("{err}"),
                    Err(err) => log::error!("{err}"),
                }
            };
            if let Err(err) = spawner.spawn_local(request) {
                log::error!("could not schedule transition to {target}: {err}");
            }
        })
    }
}
