use log::{error, info, warn};
use teatro_session::Session;
use tokio::time::sleep;

use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::obras::{save_error_message, Obra, ObraDraft, ObrasClient};
use crate::ui::{Feedback, Route};

const LOAD_FAILED_MESSAGE: &str = "Falha ao carregar obras.";
const LOAD_NETWORK_MESSAGE: &str = "Erro de conexão ao buscar obras.";
const DELETE_FAILED_MESSAGE: &str = "Falha ao apagar obra.";
const DELETE_NETWORK_MESSAGE: &str = "Erro de conexão.";
const DELETED_MESSAGE: &str = "✓ Obra removida.";
pub const CREATED_MESSAGE: &str = "✓ Obra criada com sucesso!";
pub const UPDATED_MESSAGE: &str = "✓ Obra atualizada com sucesso!";
const MISSING_ID_MESSAGE: &str = "Obra sem identificador.";

/// Which half of the catalog screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    List,
    Form,
}

/// Production catalog: list, form, detail lookup and delete confirmation
pub struct ObrasScreen {
    client: ObrasClient,
    session: Session,
    options: ClientOptions,
    route: Route,
    tab: Tab,
    obras: Vec<Obra>,
    draft: ObraDraft,
    editing: Option<Obra>,
    pending_delete: Option<Obra>,
    search: String,
    feedback: Option<Feedback>,
    busy: bool,
}

impl ObrasScreen {
    pub fn new(client: ObrasClient, session: Session, options: ClientOptions) -> Self {
        Self {
            client,
            session,
            options,
            route: Route::Obras,
            tab: Tab::List,
            obras: Vec::new(),
            draft: ObraDraft::default(),
            editing: None,
            pending_delete: None,
            search: String::new(),
            feedback: None,
            busy: false,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn obras(&self) -> &[Obra] {
        &self.obras
    }

    pub fn draft(&self) -> &ObraDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ObraDraft {
        &mut self.draft
    }

    pub fn editing(&self) -> Option<&Obra> {
        self.editing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&Obra> {
        self.pending_delete.as_ref()
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

    /// Look up a loaded production, e.g. for the detail view
    pub fn find(&self, id: i64) -> Option<&Obra> {
        self.obras.iter().find(|o| o.id == Some(id))
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    /// Loaded productions whose name or director contains the search term
    pub fn filtered(&self) -> Vec<&Obra> {
        self.obras.iter().filter(|o| o.matches(&self.search)).collect()
    }

    /// Screen became visible: bounce to login without a token, else reload
    pub async fn on_focus(&mut self) {
        if !self.session.has_valid_token() {
            self.route = Route::Auth;
            return;
        }
        if self.tab == Tab::List {
            self.refresh().await;
        }
    }

    pub async fn show_list(&mut self) {
        self.tab = Tab::List;
        self.on_focus().await;
    }

    /// Reload the list from the backend
    pub async fn refresh(&mut self) {
        self.busy = true;
        let result = self.client.list().await;
        self.busy = false;

        match result {
            Ok(obras) => self.obras = obras,
            Err(e) if e.is_unauthorized() => self.expire_session().await,
            Err(e) if e.is_transport() => {
                error!("[FETCH OBRAS NETWORK ERROR] {}", e);
                self.feedback = Some(Feedback::error(LOAD_NETWORK_MESSAGE));
            }
            Err(e) => {
                error!("[FETCH OBRAS ERROR] {}", e);
                self.feedback = Some(Feedback::error(LOAD_FAILED_MESSAGE));
            }
        }
    }

    /// Open an empty form
    pub fn new_draft(&mut self) {
        self.tab = Tab::Form;
        self.editing = None;
        self.draft = ObraDraft::default();
    }

    /// Open the form on a copy of `obra`
    pub fn start_edit(&mut self, obra: &Obra) {
        self.draft = ObraDraft::from_obra(obra);
        self.editing = Some(obra.clone());
        self.tab = Tab::Form;
    }

    /// Drop the draft and go back to the list
    pub fn cancel_edit(&mut self) {
        self.draft = ObraDraft::default();
        self.editing = None;
        self.tab = Tab::List;
    }

    /// Validate the draft and create or update the production.
    ///
    /// The result is the outcome of the save alone. The list reload that
    /// follows a successful save may replace the banner, but not this.
    pub async fn save(&mut self) -> Result<Option<Obra>> {
        let payload = match self.draft.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                let message = match &e {
                    Error::Validation(msg) => msg.clone(),
                    other => other.to_string(),
                };
                self.feedback = Some(Feedback::error(message));
                return Err(e);
            }
        };

        let editing_id = match &self.editing {
            Some(obra) => match obra.id {
                Some(id) => Some(id),
                None => {
                    self.feedback = Some(Feedback::error(MISSING_ID_MESSAGE));
                    return Err(Error::validation(MISSING_ID_MESSAGE));
                }
            },
            None => None,
        };

        self.busy = true;
        let result = self.client.save(editing_id, &payload).await;
        self.busy = false;

        match result {
            Ok(saved) => {
                let message = if editing_id.is_some() { UPDATED_MESSAGE } else { CREATED_MESSAGE };
                info!("[OBRA] saved {}", payload.name);
                self.feedback = Some(Feedback::success(message));
                self.draft = ObraDraft::default();
                self.editing = None;
                self.tab = Tab::List;

                sleep(self.options.refresh_delay).await;
                self.refresh().await;
                Ok(saved)
            }
            Err(e) => {
                if e.is_unauthorized() {
                    self.expire_session().await;
                } else if let Some(status) = e.status() {
                    self.feedback = Some(Feedback::error(save_error_message(status)));
                } else {
                    error!("[OBRA SAVE EXCEPTION] {}", e);
                    self.feedback = Some(Feedback::error(format!("Erro de conexão: {}", e)));
                }
                Err(e)
            }
        }
    }

    /// Ask for confirmation before deleting `obra`
    pub fn request_delete(&mut self, obra: &Obra) {
        self.pending_delete = Some(obra.clone());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the production awaiting confirmation, then reload the list
    pub async fn confirm_delete(&mut self) {
        let Some(obra) = self.pending_delete.take() else {
            return;
        };
        let Some(id) = obra.id else {
            self.feedback = Some(Feedback::error(MISSING_ID_MESSAGE));
            return;
        };

        self.busy = true;
        let result = self.client.delete(id).await;
        self.busy = false;

        match result {
            Ok(()) => {
                self.feedback = Some(Feedback::success(DELETED_MESSAGE));
                self.refresh().await;
            }
            Err(e) if e.is_unauthorized() => self.expire_session().await,
            Err(e) if e.is_transport() => {
                error!("[DELETE NETWORK ERROR] {}", e);
                self.feedback = Some(Feedback::error(DELETE_NETWORK_MESSAGE));
            }
            Err(e) => {
                error!("[DELETE ERROR] {}", e);
                self.feedback = Some(Feedback::error(DELETE_FAILED_MESSAGE));
            }
        }
    }

    /// Request + confirm in one step
    pub async fn delete(&mut self, obra: &Obra) {
        self.request_delete(obra);
        self.confirm_delete().await;
    }

    /// Forget the token and go back to login
    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear_token() {
            warn!("[SESSION] failed to clear token: {}", e);
        }
        self.obras.clear();
        self.route = Route::Auth;
    }

    // the token is dropped right away so nothing else goes out with it;
    // navigation waits so the banner can be read
    async fn expire_session(&mut self) {
        warn!("[SESSION] backend rejected the token, signing out");
        if let Err(e) = self.session.clear_token() {
            warn!("[SESSION] failed to clear token: {}", e);
        }
        self.feedback = Some(Feedback::error(save_error_message(401)));
        sleep(self.options.redirect_delay).await;
        self.route = Route::Auth;
    }
}
