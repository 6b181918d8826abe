use log::error;
use teatro_session::Session;
use tokio::time::sleep;

use crate::auth::{AuthClient, AuthMode, Credentials};
use crate::config::ClientOptions;
use crate::error::Error;
use crate::ui::{Feedback, Route};

const NETWORK_ERROR_MESSAGE: &str = "Erro de conexão. Verifique se o backend está rodando.";
const GENERIC_ERROR_MESSAGE: &str = "Erro ao processar solicitação.";

/// Login / registration screen
pub struct AuthScreen {
    auth: AuthClient,
    session: Session,
    options: ClientOptions,
    mode: AuthMode,
    pub username: String,
    pub password: String,
    pub password_confirm: String,
    feedback: Option<Feedback>,
    busy: bool,
    route: Route,
}

impl AuthScreen {
    pub fn new(auth: AuthClient, session: Session, options: ClientOptions) -> Self {
        Self {
            auth,
            session,
            options,
            mode: AuthMode::Login,
            username: String::new(),
            password: String::new(),
            password_confirm: String::new(),
            feedback: None,
            busy: false,
            route: Route::Auth,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn take_feedback(&mut self) -> Option<Feedback> {
        self.feedback.take()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Skip the form when a usable token is already stored
    pub fn on_focus(&mut self) {
        if self.session.has_valid_token() {
            self.route = Route::Obras;
        }
    }

    /// Flip between login and registration, clearing the form
    pub fn switch_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.username.clear();
        self.password.clear();
        self.password_confirm.clear();
        self.feedback = None;
    }

    pub fn set_mode(&mut self, mode: AuthMode) {
        if self.mode != mode {
            self.switch_mode();
        }
    }

    /// Validate the form, call the backend and move on to the catalog
    pub async fn submit(&mut self) {
        let credentials = match Credentials::validate(
            self.mode,
            &self.username,
            &self.password,
            &self.password_confirm,
        ) {
            Ok(credentials) => credentials,
            Err(e) => {
                self.feedback = Some(Feedback::error(validation_text(e)));
                return;
            }
        };

        self.busy = true;
        let result = self.auth.authenticate(self.mode, &credentials).await;
        self.busy = false;

        match result {
            Ok(_) => {
                self.feedback = Some(Feedback::success(self.mode.success_message()));
                sleep(self.options.login_redirect_delay).await;
                self.route = Route::Obras;
            }
            Err(Error::Api { status, .. }) => {
                self.feedback = Some(Feedback::error(self.mode.error_message(status)));
            }
            Err(e) if e.is_transport() => {
                error!("[AUTH NETWORK ERROR] {}", e);
                self.feedback = Some(Feedback::error(NETWORK_ERROR_MESSAGE));
            }
            Err(e) => {
                error!("[AUTH] {}", e);
                self.feedback = Some(Feedback::error(GENERIC_ERROR_MESSAGE));
            }
        }
    }
}

fn validation_text(err: Error) -> String {
    match err {
        Error::Validation(msg) => msg,
        other => other.to_string(),
    }
}
