use actix_web::{
    delete, get,
    http::{
        header::{self, ContentType},
        StatusCode,
    },
    post, put,
    web::{self, Data},
    HttpRequest, HttpResponse, Responder,
};
use actix_web_lab::respond::Html;
use contactdb::{
    consts::consts::EntityId,
    database::table::row::UpdateContactData,
    model::contact::Contact,
    store::{ContactStore, StoreError},
};

use crate::{
    error::AppError,
    flash::{self, Notice},
    forms::{ContactForm, DeleteContactForm, UpdateContactForm},
    validation::{self, FieldError},
    views,
};

type Store = Data<dyn ContactStore>;

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

fn not_found() -> HttpResponse {
    html(StatusCode::NOT_FOUND, views::not_found_page())
}

fn page(body: String) -> HttpResponse {
    html(StatusCode::OK, body)
}

/// Post/redirect/get back to the list, carrying the one-shot notice
fn redirect_to_list(notice: Notice) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/contact"))
        .cookie(notice.cookie())
        .finish()
}

#[get("/")]
async fn index() -> impl Responder {
    Html(views::index_page())
}

#[get("/about")]
async fn about() -> impl Responder {
    Html(views::about_page())
}

#[get("/contact")]
async fn list_contacts(req: HttpRequest, store: Store) -> Result<HttpResponse, AppError> {
    let contacts = store.list_all()?;
    let (notice, removal) = flash::take_notice(&req);

    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::html());

    if let Some(removal) = removal {
        response.cookie(removal);
    }

    Ok(response.body(views::contact_list_page(&contacts, notice)))
}

#[get("/contact/add")]
async fn add_contact_form() -> impl Responder {
    Html(views::add_contact_page(&ContactForm::default(), &[]))
}

#[post("/contact")]
async fn add_contact(store: Store, form: web::Form<ContactForm>) -> Result<HttpResponse, AppError> {
    let values = form.into_inner();
    let contact = values.to_contact();

    let errors = validation::validate_contact(store.get_ref(), &contact, None)?;

    if !errors.is_empty() {
        return Ok(page(views::add_contact_page(&values, &errors)));
    }

    match store.insert(contact) {
        Ok(stored) => {
            log::info!("Added contact [{}]", stored.id);
            Ok(redirect_to_list(Notice::Added))
        }
        // Lost a race with another add of the same name
        Err(StoreError::DuplicateName(_)) => Ok(page(views::add_contact_page(
            &values,
            &[FieldError::duplicate_name()],
        ))),
        Err(err) => Err(err.into()),
    }
}

/// Link-style delete, the key is an id or a name
#[get("/contact/delete/{key}")]
async fn delete_contact_by_link(store: Store, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    delete_by_key(store.get_ref(), &key)
}

/// Form-style delete, reached through `POST /contact/delete?_method=DELETE`
#[delete("/contact/delete")]
async fn delete_contact(store: Store, form: web::Form<DeleteContactForm>) -> Result<HttpResponse, AppError> {
    delete_by_key(store.get_ref(), form.key())
}

/// Deleting something that is not there still lands on the list
fn delete_by_key(store: &dyn ContactStore, key: &str) -> Result<HttpResponse, AppError> {
    match store.delete_by_key(key)? {
        Some(deleted) => log::info!("Deleted contact [{}]", deleted.id),
        None => log::info!("Nothing to delete for [{}]", key),
    }

    Ok(redirect_to_list(Notice::Deleted))
}

#[get("/contact/edit/{id}")]
async fn edit_contact_form(store: Store, id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let Some(contact) = store.find_by_id(&EntityId::from(id.as_str()))? else {
        return Ok(not_found());
    };

    Ok(page(views::edit_contact_page(&contact, &ContactForm::from_contact(&contact), &[])))
}

#[put("/contact")]
async fn update_contact(store: Store, form: web::Form<UpdateContactForm>) -> Result<HttpResponse, AppError> {
    let Some(existing) = store.find_by_key(form.key())? else {
        return Ok(not_found());
    };

    let values = form.contact_form();
    let Contact {
        name,
        number,
        email,
        ..
    } = values.to_contact();

    let candidate = Contact {
        id: existing.id.clone(),
        name,
        number,
        email,
    };

    let errors = validation::validate_contact(store.get_ref(), &candidate, Some(&existing))?;

    if !errors.is_empty() {
        return Ok(page(views::edit_contact_page(&existing, &values, &errors)));
    }

    let update = UpdateContactData::replace_all(candidate.name, candidate.number, candidate.email);

    match store.update(&existing.id, update) {
        Ok(Some(updated)) => {
            log::info!("Updated contact [{}]", updated.id);
            Ok(redirect_to_list(Notice::Updated))
        }
        Ok(None) => Ok(not_found()),
        Err(StoreError::DuplicateName(_)) => Ok(page(views::edit_contact_page(
            &existing,
            &values,
            &[FieldError::duplicate_name()],
        ))),
        Err(err) => Err(err.into()),
    }
}

#[get("/contact/{key}")]
async fn contact_detail(store: Store, key: web::Path<String>) -> Result<HttpResponse, AppError> {
    match store.find_by_key(&key)? {
        Some(contact) => Ok(page(views::contact_detail_page(&contact))),
        None => Ok(not_found()),
    }
}

async fn fallback() -> HttpResponse {
    not_found()
}

/// Literal paths are registered before `/contact/{key}` so they are never read as a key
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(about)
        .service(list_contacts)
        .service(add_contact_form)
        .service(add_contact)
        .service(delete_contact_by_link)
        .service(delete_contact)
        .service(edit_contact_form)
        .service(update_contact)
        .service(contact_detail)
        .default_service(web::to(fallback));
}
