use log::{info, warn};

use crate::auth::AuthClient;
use crate::config::Config;
use crate::storage::{ImageId, Storage};
use crate::token_store::{FileTokenStore, TokenStore};

mod editor;
mod login;
mod menu;
mod native;
mod viewer;

pub use native::run_native;

use editor::{EditorEvent, EditorScreen};
use login::LoginScreen;

pub(crate) struct RedactApp {
    auth: AuthClient,
    token_store: Box<dyn TokenStore>,
    storage: Box<dyn Storage>,
    image_id: ImageId,
    screen: Screen,
}

enum Screen {
    Login(LoginScreen),
    Editor(EditorScreen),
}

enum Transition {
    SignedIn(String),
    LoggedOut,
}

impl RedactApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &Config,
        storage: Box<dyn Storage>,
        image_id: ImageId,
    ) -> Self {
        let token_store = Box::new(FileTokenStore::new(config.token_path.clone()));
        let auth = AuthClient::new(config.server_url.clone());

        let screen = match token_store.load() {
            Ok(Some(_)) => {
                info!("found persisted token, skipping sign-in");
                Screen::Editor(EditorScreen::new())
            }
            Ok(None) => Screen::Login(LoginScreen::new(auth.clone())),
            Err(e) => {
                warn!("could not read persisted token: {e}");
                Screen::Login(LoginScreen::new(auth.clone()))
            }
        };

        Self {
            auth,
            token_store,
            storage,
            image_id,
            screen,
        }
    }
}

impl eframe::App for RedactApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let transition = match &mut self.screen {
                Screen::Login(login) => login.ui(ui).map(Transition::SignedIn),
                Screen::Editor(editor) => editor
                    .ui(ui, self.storage.as_ref(), &self.image_id)
                    .map(|EditorEvent::Logout| Transition::LoggedOut),
            };

            match transition {
                Some(Transition::SignedIn(token)) => {
                    if let Err(e) = self.token_store.store(&token) {
                        warn!("could not persist token: {e}");
                    }
                    info!("signed in");
                    self.screen = Screen::Editor(EditorScreen::new());
                }
                Some(Transition::LoggedOut) => {
                    if let Err(e) = self.token_store.clear() {
                        warn!("could not clear token: {e}");
                    }
                    self.screen = Screen::Login(LoginScreen::new(self.auth.clone()));
                }
                None => {}
            }
        });
    }
}
