//! Background construction of a scene ahead of its activation.

use super::blueprint::SceneKind;
use super::resource::{SceneFactory, SceneResource};
use crate::error::SceneError;
use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};
use std::future::Future;
use std::rc::Rc;

type Loading<R> = Shared<LocalBoxFuture<'static, Result<Rc<R>, SceneError>>>;

/// A scene built once and awaited by whoever needs it first.
///
/// Construction happens in [`Prefetch::start`]. Every clone and every call to
/// [`Prefetch::scene`] observes the same in-flight or completed load; nothing
/// here ever constructs a second resource. A scene that fails to become ready
/// is disposed before the error is reported.
pub struct Prefetch<R> {
    kind: SceneKind,
    loading: Loading<R>,
}

impl<R> Clone for Prefetch<R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            loading: self.loading.clone(),
        }
    }
}

impl<R: SceneResource + 'static> Prefetch<R> {
    pub fn start<F>(factory: &F, kind: SceneKind) -> Self
    where
        F: SceneFactory<Scene = R>,
    {
        log::debug!("pre-fetching {kind} scene");
        let constructed = factory.construct(kind).map(Rc::new);

        let loading = async move {
            let scene = match constructed {
                Ok(scene) => scene,
                Err(err) => return Err(err),
            };
            match scene.when_ready().await {
                Ok(()) => {
                    log::debug!("pre-fetched {kind} scene is ready");
                    Ok(scene)
                }
                Err(err) => {
                    scene.detach_input();
                    scene.dispose();
                    Err(err)
                }
            }
        }
        .boxed_local()
        .shared();

        Self { kind, loading }
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    /// Wait for the scene.
    pub async fn scene(&self) -> Result<Rc<R>, SceneError> {
        self.loading.clone().await
    }

    /// Returns true once the load has completed, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.loading.peek().is_some()
    }

    /// A future that drives the load to completion and discards the result.
    ///
    /// Spawn it so the load makes progress while nobody awaits the scene.
    pub fn settle(&self) -> impl Future<Output = ()> + use<R> {
        self.loading.clone().map(|_| ())
    }
}
