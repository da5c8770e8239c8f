use egui::{self, Align2};

use crate::auth::{AuthClient, AuthError};
use crate::jobs::UiFuture;

enum CredentialAction {
    LogIn,
    SignUp,
}

/// Sign-in form. Returns the bearer token once an exchange succeeds; the
/// caller persists it and moves on to the editor.
pub(crate) struct LoginScreen {
    auth: AuthClient,
    username: String,
    password: String,
    alert: Option<String>,
    job: Option<UiFuture<Result<String, AuthError>>>,
}

impl LoginScreen {
    pub fn new(auth: AuthClient) -> Self {
        Self {
            auth,
            username: String::new(),
            password: String::new(),
            alert: None,
            job: None,
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<String> {
        if let Some(job) = &mut self.job {
            if let Some(result) = job.take() {
                self.job = None;
                match result {
                    Ok(token) => return Some(token),
                    Err(e) => self.alert = Some(format!("error: {e}")),
                }
            }
        }

        ui.heading("Redact Tool");
        ui.label("Sign in to mark redaction regions.");
        ui.add_space(8.0);

        egui::Grid::new("credentials").num_columns(2).show(ui, |ui| {
            ui.label("Username");
            ui.text_edit_singleline(&mut self.username);
            ui.end_row();
            ui.label("Password");
            ui.add(egui::TextEdit::singleline(&mut self.password).password(true));
            ui.end_row();
        });

        let busy = self.job.is_some();
        ui.horizontal(|ui| {
            ui.scope(|ui| {
                if busy {
                    ui.disable();
                }
                if ui.button("Log in").clicked() {
                    self.submit_credentials(CredentialAction::LogIn);
                }
                if ui.button("Sign up").clicked() {
                    self.submit_credentials(CredentialAction::SignUp);
                }
                if ui.button("Continue as guest").clicked() {
                    let auth = self.auth.clone();
                    self.job = Some(UiFuture::spawn_blocking(move || auth.guest()));
                }
            });
            if busy {
                ui.spinner();
            }
        });

        self.alert_ui(ui);
        None
    }

    fn submit_credentials(&mut self, action: CredentialAction) {
        if self.username.is_empty() || self.password.is_empty() {
            self.alert = Some("enter username and password".into());
            return;
        }
        let auth = self.auth.clone();
        let username = self.username.clone();
        let password = self.password.clone();
        self.job = Some(UiFuture::spawn_blocking(move || match action {
            CredentialAction::LogIn => auth.login(&username, &password),
            CredentialAction::SignUp => auth.signup(&username, &password),
        }));
    }

    /// Centered alert window carrying the failure message, dismissed with OK.
    fn alert_ui(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ui.ctx(), |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.alert = None;
        }
    }
}
