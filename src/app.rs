use std::collections::HashMap;
use std::sync::Arc;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::config::AppConfig;
use crate::domain::entities::dataset::{DatasetConfig, DatasetKind};
use crate::domain::entities::edit::{CellKey, TicketField};
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::entities::ticket::{NewTicketDraft, TicketFields, TicketId, TicketStatus, ValidationError};
use crate::domain::filter::{StatusFilter, TicketFilter};
use crate::domain::summary::{counters, dashboard, Distribution};
use crate::infra::sqlite::repo::SqliteRepo;
use crate::ui::state::app_state::{AppState, Page};
use crate::usecase::ports::repo::{RepoError, TicketRepository};
use crate::usecase::services::auth_service::AuthService;
use crate::usecase::services::edit_service::EditService;
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::query_service::QueryService;

const CELL_STYLE: &str = "border: 1px solid #2d4a5e; padding: 4px 6px; text-align: left;";
const HEADER_CELL_STYLE: &str = "border: 1px solid #2d4a5e; padding: 6px; background: #1a2b3c; color: #a3c4d8; position: sticky; top: 0;";
const PENDENCY_ALL: &str = "Todos";

#[derive(Clone)]
pub struct AppServices {
    pub query: Arc<QueryService>,
    pub edit: Arc<EditService>,
    pub auth: Arc<AuthService>,
    pub export: Arc<ExportService>,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Result<Self, RepoError> {
        let repo = Arc::new(SqliteRepo {
            db_path: config.db_path.clone(),
        });
        repo.init()?;

        let query = Arc::new(QueryService::new(repo.clone(), config.cache_ttl));
        let edit = Arc::new(EditService::new(repo.clone(), query.clone()));
        let auth = Arc::new(AuthService::new(repo));
        if let Some(admin) = &config.admin {
            if let Err(err) = auth.ensure_user(&admin.email, &admin.password) {
                tracing::warn!(error = %err, "failed to bootstrap admin user");
            }
        }

        Ok(Self {
            query,
            edit,
            auth,
            export: Arc::new(ExportService),
        })
    }
}

fn current_filter(app: AppState) -> TicketFilter {
    TicketFilter {
        status: *app.status_filter.read(),
        pendency: app.pendency_filter.cloned(),
        search: app.search.cloned(),
    }
}

fn load_snapshot_into(query: &QueryService, dataset: DatasetKind, mut app: AppState) {
    app.busy.set(true);
    match query.load_snapshot(dataset) {
        Ok(loaded) => {
            let rows = loaded.len();
            app.staged.write().retain_tickets(&loaded);
            app.snapshot.set(loaded);
            app.status
                .set(format!("{rows} chamado(s) carregado(s) de {}", dataset.label()));
        }
        Err(err) => {
            app.snapshot.set(Snapshot::default());
            app.status
                .set(format!("Erro ao carregar os chamados: {err}"));
        }
    }
    app.busy.set(false);
}

fn confirm_discard() -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Alterações não salvas")
        .set_description("Descartar as alterações ainda não salvas?")
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}

fn navigate(target: Page, mut app: AppState) {
    let current = *app.page.read();
    if current == target {
        return;
    }
    if current.dataset() != target.dataset() {
        if !app.staged.read().is_empty() && !confirm_discard() {
            return;
        }
        app.staged.write().clear();
        app.editing_cell.set(None);
        app.pendency_filter.set(None);
        app.new_ticket
            .set(NewTicketDraft::for_dataset(target.dataset().config()));
    }
    app.page.set(target);
}

fn commit_edit(mut app: AppState, key: CellKey, value: String, original: &str) {
    if matches!(key.field, TicketField::Title | TicketField::Owner) && value.trim().is_empty() {
        app.status.set(ValidationError::MissingRequired.to_string());
        return;
    }
    if value == original {
        app.staged.write().unstage(&key);
    } else {
        app.staged.write().stage(key, value);
    }
    app.editing_cell.set(None);
    app.editing_value.set(String::new());
}

fn cancel_edit(mut app: AppState) {
    app.editing_cell.set(None);
    app.editing_value.set(String::new());
}

fn save_staged(edit: &EditService, query: &QueryService, mut app: AppState) {
    let dataset = app.page.read().dataset();
    let baseline = app.snapshot.cloned();
    let edited = app.staged.read().apply_to(&baseline);

    app.busy.set(true);
    match edit.save_changes(dataset, &baseline, &edited) {
        Ok(report) => {
            let failed: Vec<TicketId> = report.failed.iter().map(|(id, _)| *id).collect();
            app.staged
                .write()
                .staged_cells
                .retain(|key, _| failed.contains(&key.id));
            app.editing_cell.set(None);
            if !report.saved.is_empty() {
                load_snapshot_into(query, dataset, app);
            }
            app.status.set(report.message());
        }
        Err(err) => {
            tracing::error!(?dataset, error = %err, "reconciliation failed");
            app.status.set(format!("Erro ao salvar alterações: {err}"));
        }
    }
    app.busy.set(false);
}

fn submit_new_ticket(edit: &EditService, query: &QueryService, mut app: AppState) {
    let dataset = app.page.read().dataset();
    let draft = app.new_ticket.cloned();
    match edit.create_ticket(dataset, &draft) {
        Ok(id) => {
            app.new_ticket
                .set(NewTicketDraft::for_dataset(dataset.config()));
            app.show_add_form.set(false);
            load_snapshot_into(query, dataset, app);
            app.status
                .set(format!("Chamado {id} cadastrado com sucesso!"));
        }
        Err(err) => {
            app.status.set(err.to_string());
        }
    }
}

fn export_view(export: &ExportService, mut app: AppState) {
    let dataset = app.page.read().dataset();
    let view = current_filter(app).apply(dataset.config(), &app.snapshot.read());
    let Some(path) = FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_file_name(format!("{}.csv", dataset.config().table))
        .save_file()
    else {
        return;
    };
    match export.export_csv(&path, dataset, &view) {
        Ok(rows) => app
            .status
            .set(format!("{rows} chamado(s) exportado(s) para {}", path.display())),
        Err(err) => app.status.set(format!("Erro ao exportar: {err:#}")),
    }
}

#[component]
fn MetricBox(label: String, value: usize) -> Element {
    rsx! {
        div {
            style: "flex: 1; background: rgba(26, 43, 60, 0.8); padding: 20px; border-radius: 12px; text-align: center; border: 1px solid rgba(109, 213, 237, 0.3);",
            div { style: "font-size: 1.05rem; color: #a3c4d8; margin-bottom: 8px;", "{label}" }
            div { style: "font-size: 2rem; font-weight: 700; color: #6dd5ed;", "{value}" }
        }
    }
}

fn bar_width(count: usize, max: usize) -> usize {
    if max == 0 {
        0
    } else {
        count * 100 / max
    }
}

#[component]
fn BarChart(title: String, rows: Vec<Distribution>) -> Element {
    let max = rows.iter().map(|row| row.count).max().unwrap_or(0);
    rsx! {
        div {
            style: "background: rgba(26, 43, 60, 0.8); border-radius: 10px; padding: 16px; margin-bottom: 16px;",
            h3 { style: "color: #6dd5ed; margin-top: 0;", "{title}" }
            if rows.is_empty() {
                p { "Nenhum dado disponível." }
            }
            {rows.iter().map(|row| {
                let label = row.label.clone();
                let count = row.count;
                let width = bar_width(count, max);
                rsx! {
                    div {
                        key: "{label}",
                        style: "display: flex; align-items: center; gap: 8px; margin-bottom: 6px;",
                        span { style: "width: 180px; overflow: hidden; text-overflow: ellipsis;", "{label}" }
                        div { style: "flex: 1; background: #0f2027; height: 18px; border-radius: 4px;",
                            div { style: "background: #2193b0; height: 18px; border-radius: 4px; width: {width}%;" }
                        }
                        span { style: "width: 40px; text-align: right;", "{count}" }
                    }
                }
            })}
        }
    }
}

fn cell_editor(mut app: AppState, key: CellKey, config: &'static DatasetConfig, original: String) -> Element {
    let value = app.editing_value.cloned();
    match key.field {
        TicketField::Pendency | TicketField::Status => {
            let choices: Vec<&'static str> = if key.field == TicketField::Pendency {
                config.pendency_names().to_vec()
            } else {
                TicketStatus::ALL.iter().map(|status| status.as_str()).collect()
            };
            rsx! {
                select {
                    autofocus: true,
                    onchange: move |event| commit_edit(app, key, event.value(), &original),
                    onkeydown: move |event| {
                        if event.key() == Key::Escape {
                            cancel_edit(app);
                        }
                    },
                    for name in choices {
                        option { value: "{name}", selected: name == value, "{name}" }
                    }
                }
            }
        }
        field => {
            let input_type = match field {
                TicketField::OpenDate => "date",
                TicketField::NumericRef => "number",
                _ => "text",
            };
            rsx! {
                input {
                    r#type: input_type,
                    autofocus: true,
                    value: value,
                    oninput: move |event| app.editing_value.set(event.value()),
                    onkeydown: move |event| {
                        if event.key() == Key::Enter {
                            let next = app.editing_value.cloned();
                            commit_edit(app, key, next, &original);
                        } else if event.key() == Key::Escape {
                            cancel_edit(app);
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let setup = use_hook(|| -> Result<(AppServices, DatasetKind), String> {
        let config = AppConfig::from_env().map_err(|err| format!("{err:#}"))?;
        let services = AppServices::new(&config).map_err(|err| err.to_string())?;
        tracing::info!(db_path = %config.db_path.display(), "database ready");
        Ok((services, config.default_dataset))
    });
    let default_dataset = setup
        .as_ref()
        .map(|(_, dataset)| *dataset)
        .unwrap_or(DatasetKind::Pixeon);
    let mut app = AppState::new(default_dataset);

    let services = match setup {
        Ok((services, _)) => services,
        Err(err) => {
            return rsx! {
                div {
                    p { "Não foi possível iniciar o banco de dados: {err}" }
                }
            };
        }
    };

    let query_for_load = services.query.clone();
    use_effect(move || {
        if !app.session.read().is_signed_in() {
            return;
        }
        let dataset = app.page.read().dataset();
        load_snapshot_into(&query_for_load, dataset, app);
    });

    let current_status = app.status.cloned();
    let is_busy = *app.busy.read();

    if !app.session.read().is_signed_in() {
        let auth = services.auth.clone();
        return rsx! {
            div {
                style: "min-height: 100vh; display: flex; align-items: center; justify-content: center; background: linear-gradient(135deg, #0f2027 0%, #203a43 50%, #2c5364 100%); color: #f0f2f6; font-family: sans-serif;",
                div {
                    style: "background: #1e1e1e; padding: 2rem; border-radius: 10px; width: 400px; display: flex; flex-direction: column; gap: 8px;",
                    h1 { "🔒 Login" }
                    label { "E-mail" }
                    input {
                        value: app.login_email.cloned(),
                        oninput: move |event| app.login_email.set(event.value()),
                    }
                    label { "Senha" }
                    input {
                        r#type: "password",
                        value: app.login_password.cloned(),
                        oninput: move |event| app.login_password.set(event.value()),
                    }
                    button {
                        onclick: move |_| {
                            let email = app.login_email.cloned();
                            let password = app.login_password.cloned();
                            match auth.login(&email, &password) {
                                Ok(user) => {
                                    app.status.set(format!("Login realizado com sucesso! ({})", user.email));
                                    app.session.write().sign_in(user);
                                    app.login_password.set(String::new());
                                }
                                Err(err) => app.status.set(err.to_string()),
                            }
                        },
                        "Entrar"
                    }
                    p { style: "color: #a3c4d8;", "{current_status}" }
                }
            }
        };
    }

    let current_page = *app.page.read();
    let dataset = current_page.dataset();
    let config = dataset.config();
    let complete = app.snapshot.cloned();
    let filter = current_filter(app);
    let view = filter.apply(config, &complete);
    let user_email = app
        .session
        .read()
        .current_user()
        .map(|user| user.email.clone())
        .unwrap_or_default();
    let pending_edits = app.staged.read().len();

    let query_for_reload = services.query.clone();
    let body = match current_page {
        Page::Dashboard(_) => {
            let data = dashboard(&complete);
            rsx! {
                h2 { "📊 Dashboard de Chamados – {config.label}" }
                div { style: "display: flex; gap: 8px; margin-bottom: 12px;",
                    for kind in DatasetKind::ALL {
                        button {
                            disabled: kind == dataset,
                            onclick: move |_| navigate(Page::Dashboard(kind), app),
                            {kind.label()}
                        }
                    }
                }
                if complete.is_empty() {
                    p { "Nenhum dado disponível para exibir no dashboard." }
                } else {
                    div { style: "display: grid; grid-template-columns: 1fr 1fr; gap: 16px;",
                        BarChart { title: "Distribuição por Status".to_string(), rows: data.by_status.clone() }
                        BarChart { title: "Chamados por Pendência".to_string(), rows: data.by_pendency.clone() }
                    }
                    BarChart { title: "Chamados por Usuário".to_string(), rows: data.by_owner.clone() }
                }
            }
        }
        Page::Tickets(_) => {
            let summary = counters(config, &complete, &view);
            let staged = app.staged.cloned();
            let edited_view = staged.apply_to(&view);
            let originals: HashMap<TicketId, &TicketFields> = view
                .iter()
                .map(|ticket| (ticket.id, &ticket.fields))
                .collect();
            let editing = app.editing_cell.cloned();
            let draft = app.new_ticket.cloned();
            let show_add_form = *app.show_add_form.read();
            let edit_for_create = services.edit.clone();
            let query_for_create = services.query.clone();
            let edit_for_save = services.edit.clone();
            let query_for_save = services.query.clone();
            let export_for_click = services.export.clone();
            rsx! {
                h2 { "Resumo dos Chamados" }
                div { style: "display: flex; gap: 16px; margin-bottom: 20px;",
                    MetricBox { label: "📋 Chamados Abertos".to_string(), value: summary.open }
                    MetricBox { label: "✅ Chamados Concluídos".to_string(), value: summary.completed }
                    for (label, total) in summary.pendency.iter() {
                        MetricBox { key: "{label}", label: format!("📍 {label}"), value: *total }
                    }
                }

                div { style: "margin-bottom: 16px;",
                    button {
                        onclick: move |_| {
                            let next = !*app.show_add_form.read();
                            app.show_add_form.set(next);
                        },
                        if show_add_form { "➖ Fechar formulário" } else { "➕ Inserir Novo Chamado" }
                    }
                }

                if show_add_form {
                    div {
                        style: "display: grid; grid-template-columns: 160px 1fr 160px 1fr; gap: 6px; background: rgba(26, 43, 60, 0.8); padding: 16px; border-radius: 10px; margin-bottom: 16px;",
                        label { "{config.numeric_ref.label}" }
                        input {
                            r#type: "number",
                            min: "0",
                            value: draft.numeric_ref.clone(),
                            oninput: move |event| app.new_ticket.write().numeric_ref = event.value(),
                        }
                        label { "{config.text_ref.label}" }
                        input {
                            value: draft.text_ref.clone(),
                            oninput: move |event| app.new_ticket.write().text_ref = event.value(),
                        }
                        label { "Título*" }
                        input {
                            placeholder: "Descrição do chamado",
                            value: draft.title.clone(),
                            oninput: move |event| app.new_ticket.write().title = event.value(),
                        }
                        label { "Data de Abertura*" }
                        input {
                            r#type: "date",
                            value: draft.open_date.clone(),
                            oninput: move |event| app.new_ticket.write().open_date = event.value(),
                        }
                        label { "Pendência*" }
                        select {
                            onchange: move |event| app.new_ticket.write().pendency = event.value(),
                            for name in config.pendency_names() {
                                option { value: "{name}", selected: draft.pendency == name, "{name}" }
                            }
                        }
                        label { "Usuário Responsável*" }
                        input {
                            value: draft.owner.clone(),
                            oninput: move |event| app.new_ticket.write().owner = event.value(),
                        }
                        label { "Status*" }
                        select {
                            onchange: move |event| app.new_ticket.write().status = event.value(),
                            for ticket_status in TicketStatus::ALL {
                                option {
                                    value: "{ticket_status}",
                                    selected: draft.status == ticket_status.as_str(),
                                    "{ticket_status}"
                                }
                            }
                        }
                        label { "Observações" }
                        textarea {
                            value: draft.notes.clone(),
                            oninput: move |event| app.new_ticket.write().notes = event.value(),
                        }
                        button {
                            disabled: is_busy,
                            onclick: move |_| submit_new_ticket(&edit_for_create, &query_for_create, app),
                            "Cadastrar Chamado"
                        }
                    }
                }

                h3 { "Lista de Chamados" }
                div { style: "display: flex; gap: 8px; margin-bottom: 8px; align-items: center;",
                    button {
                        disabled: is_busy || pending_edits == 0,
                        onclick: move |_| save_staged(&edit_for_save, &query_for_save, app),
                        "💾 Salvar Alterações"
                    }
                    button {
                        disabled: is_busy || pending_edits == 0,
                        onclick: move |_| {
                            if confirm_discard() {
                                app.staged.write().clear();
                                cancel_edit(app);
                                app.status.set("Alterações descartadas".to_string());
                            }
                        },
                        "Descartar"
                    }
                    button {
                        disabled: is_busy || view.is_empty(),
                        onclick: move |_| export_view(&export_for_click, app),
                        "Exportar CSV"
                    }
                    if pending_edits > 0 {
                        span { style: "color: #f5c26b;", "{pending_edits} célula(s) alterada(s) não salva(s)" }
                    }
                }

                if view.is_empty() {
                    p { "Nenhum chamado encontrado com os filtros atuais." }
                } else {
                    div { style: "max-height: 70vh; overflow: auto;",
                        table { style: "border-collapse: collapse; width: 100%;",
                            thead {
                                tr {
                                    th { style: "{HEADER_CELL_STYLE}", "Nº" }
                                    for field in TicketField::EDITABLE {
                                        th { style: "{HEADER_CELL_STYLE}", {field.header(config)} }
                                    }
                                }
                            }
                            tbody {
                                {edited_view.iter().enumerate().map(|(idx, ticket)| {
                                    let ticket_id = ticket.id;
                                    let fields = ticket.fields.clone();
                                    let original = originals.get(&ticket_id).copied();
                                    rsx! {
                                        tr { key: "{ticket_id}",
                                            td { style: "{CELL_STYLE}", "{idx + 1}" }
                                            {TicketField::EDITABLE.iter().map(|&field| {
                                                let key = CellKey { id: ticket_id, field };
                                                let background = if staged.value_for(&key).is_some() {
                                                    "background: #5c4a12;"
                                                } else {
                                                    ""
                                                };
                                                let original_value = original
                                                    .map(|fields| field.read(fields))
                                                    .unwrap_or_default();
                                                if editing == Some(key) {
                                                    rsx! {
                                                        td { style: "{CELL_STYLE} {background}",
                                                            {cell_editor(app, key, config, original_value)}
                                                        }
                                                    }
                                                } else {
                                                    let current = field.read(&fields);
                                                    let shown = field.display(&fields);
                                                    rsx! {
                                                        td {
                                                            style: "{CELL_STYLE} {background}",
                                                            ondoubleclick: move |_| {
                                                                app.editing_cell.set(Some(key));
                                                                app.editing_value.set(current.clone());
                                                            },
                                                            "{shown}"
                                                        }
                                                    }
                                                }
                                            })}
                                        }
                                    }
                                })}
                            }
                        }
                    }
                }
            }
        }
    };

    let current_status_filter = filter.status;
    let current_pendency = filter.pendency.clone().unwrap_or_else(|| PENDENCY_ALL.to_string());
    rsx! {
        div {
            style: "display: flex; min-height: 100vh; background: linear-gradient(135deg, #0f2027 0%, #203a43 50%, #2c5364 100%); color: #f0f2f6; font-family: sans-serif;",
            div {
                style: "width: 260px; background: #1a2b3c; border-right: 1px solid #2d4a5e; padding: 16px; display: flex; flex-direction: column; gap: 8px;",
                div { style: "font-size: 0.9rem; color: #a3c4d8;", "{user_email}" }
                button {
                    onclick: move |_| {
                        if !app.staged.read().is_empty() && !confirm_discard() {
                            return;
                        }
                        app.staged.write().clear();
                        app.snapshot.set(Snapshot::default());
                        app.session.write().sign_out();
                        app.status.set("Sessão encerrada".to_string());
                    },
                    "Sair"
                }
                h3 { "Navegação" }
                for kind in DatasetKind::ALL {
                    button {
                        disabled: current_page == Page::Tickets(kind),
                        onclick: move |_| navigate(Page::Tickets(kind), app),
                        {kind.label()}
                    }
                }
                button {
                    disabled: matches!(current_page, Page::Dashboard(_)),
                    onclick: move |_| navigate(Page::Dashboard(dataset), app),
                    "Dashboard"
                }
                if matches!(current_page, Page::Tickets(_)) {
                    h3 { "Filtros e Pesquisa" }
                    label { "Filtrar por Status" }
                    select {
                        onchange: move |event| app.status_filter.set(StatusFilter::from_label(&event.value())),
                        for choice in StatusFilter::ALL {
                            option {
                                value: choice.label(),
                                selected: choice == current_status_filter,
                                {choice.label()}
                            }
                        }
                    }
                    label { "Filtrar por Pendência" }
                    select {
                        onchange: move |event| {
                            let value = event.value();
                            app.pendency_filter.set((value != PENDENCY_ALL).then_some(value));
                        },
                        option { value: PENDENCY_ALL, selected: current_pendency == PENDENCY_ALL, "{PENDENCY_ALL}" }
                        for name in config.pendency_names() {
                            option { value: "{name}", selected: current_pendency == name, "{name}" }
                        }
                    }
                    label { "Pesquisar por Número, Título ou Responsável" }
                    input {
                        value: app.search.cloned(),
                        placeholder: "Digite o termo de pesquisa",
                        oninput: move |event| app.search.set(event.value()),
                    }
                }
                button {
                    disabled: is_busy,
                    onclick: move |_| {
                        query_for_reload.invalidate(dataset);
                        load_snapshot_into(&query_for_reload, dataset, app);
                    },
                    "Recarregar"
                }
                div { style: "margin-top: auto; font-size: 0.85rem; color: #a3c4d8;", "{current_status}" }
            }
            div { style: "flex: 1; padding: 24px; overflow: auto;",
                h1 {
                    style: "text-align: center; background: linear-gradient(135deg, #2193b0 0%, #6dd5ed 100%); color: white; padding: 20px; border-radius: 12px;",
                    "🖥️ Gestão de Chamados – {config.label}"
                }
                {body}
            }
        }
    }
}
