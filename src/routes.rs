use std::convert::Infallible;
use std::sync::Arc;

use log::error;
use serde::de::DeserializeOwned;
use warp::http::{header, StatusCode, Uri};
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::auth::{self, SESSION_COOKIE};
use crate::flash::{self, Flash, FLASH_COOKIE};
use crate::forms::{LoginForm, RegisterForm};
use crate::pages;
use crate::vestibule::{Authed, Deny, LoginError, RegisterError, Vestibule};

pub fn routes(
    app: Arc<Vestibule>,
    secure: bool,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    index(Arc::clone(&app))
        .or(login(Arc::clone(&app), secure))
        .or(logout(Arc::clone(&app)))
        .or(register(app))
        .recover(recover_deny)
}

fn index(
    app: Arc<Vestibule>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .and(authenticated(app))
        .and(flash_cookie())
        .map(|authed: Authed, flash: Option<Flash>| {
            let page = pages::dashboard(authed.username(), flash.as_ref());

            consume_flash(warp::reply::html(page).into_response(), &flash)
        })
}

fn login(
    app: Arc<Vestibule>,
    secure: bool,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let page = warp::path!("login")
        .and(warp::get())
        .and(session_user(Arc::clone(&app)))
        .and(flash_cookie())
        .map(|user: Option<Authed>, flash: Option<Flash>| {
            if user.is_some() {
                return warp::redirect::found(Uri::from_static("/")).into_response();
            }

            let page = pages::login(flash.as_ref());

            consume_flash(warp::reply::html(page).into_response(), &flash)
        });

    let submit = warp::path!("login")
        .and(warp::post())
        .and(with_app(Arc::clone(&app)))
        .and(session_user(app))
        .and(with_secure(secure))
        .and(flash_cookie())
        .and(form_body::<LoginForm>())
        .and_then(handle_login);

    page.or(submit)
}

fn logout(
    app: Arc<Vestibule>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path!("logout")
        .and(warp::get())
        .and(authenticated(app))
        .and_then(handle_logout)
}

fn register(
    app: Arc<Vestibule>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let page = warp::path!("register")
        .and(warp::get())
        .and(flash_cookie())
        .map(|flash: Option<Flash>| {
            let page = pages::register(flash.as_ref());

            consume_flash(warp::reply::html(page).into_response(), &flash)
        });

    let submit = warp::path!("register")
        .and(warp::post())
        .and(with_app(app))
        .and(flash_cookie())
        .and(form_body::<RegisterForm>())
        .and_then(handle_register);

    page.or(submit)
}

async fn handle_login(
    app: Arc<Vestibule>,
    user: Option<Authed>,
    secure: bool,
    pending: Option<Flash>,
    form: Option<LoginForm>,
) -> Result<Response, Rejection> {
    if user.is_some() {
        return Ok(warp::redirect::found(Uri::from_static("/")).into_response());
    }

    let rerender = |flash: Flash| {
        Ok(consume_flash(
            warp::reply::html(pages::login(Some(&flash))).into_response(),
            &pending,
        ))
    };

    let Some(form) = form else {
        // an incomplete login is a failed login
        return rerender(Flash::danger("Invalid username or password"));
    };

    match app.login(&form).await {
        Ok(authed) => {
            let response = warp::redirect::found(Uri::from_static("/")).into_response();
            let response =
                set_cookie(response, auth::session_cookie(&authed.token(), secure));

            // a fresh flash replaces any pending one under the same name
            Ok(set_cookie(
                response,
                flash::cookie(&Flash::success("Logged in successfully!")),
            ))
        }
        Err(LoginError::InvalidCredentials) => {
            rerender(Flash::danger("Invalid username or password"))
        }
        Err(LoginError::Internal) => Err(warp::reject::custom(Deny::Internal)),
    }
}

async fn handle_logout(authed: Authed) -> Result<Response, Rejection> {
    authed.logout().await.map_err(warp::reject::custom)?;

    let response = warp::redirect::found(Uri::from_static("/login")).into_response();

    Ok(set_cookie(response, auth::clear_session_cookie()))
}

async fn handle_register(
    app: Arc<Vestibule>,
    pending: Option<Flash>,
    form: Option<RegisterForm>,
) -> Result<Response, Rejection> {
    let rerender = |flash: Flash| {
        Ok(consume_flash(
            warp::reply::html(pages::register(Some(&flash))).into_response(),
            &pending,
        ))
    };

    let Some(form) = form else {
        return rerender(Flash::danger("All fields are required"));
    };

    match app.register(&form).await {
        Ok(()) => {
            let response = warp::redirect::found(Uri::from_static("/login")).into_response();

            Ok(set_cookie(
                response,
                flash::cookie(&Flash::success("Registration successful! Please log in.")),
            ))
        }
        Err(RegisterError::Validation(e)) => rerender(Flash::danger(e.to_string())),
        Err(RegisterError::DuplicateUsername) => {
            rerender(Flash::danger("Username is already taken"))
        }
        Err(RegisterError::Internal) => Err(warp::reject::custom(Deny::Internal)),
    }
}

/// Turns `Deny` rejections into responses: a silent redirect to the
/// login page, or a plain status for store failures. Anything else is
/// left for warp's defaults.
async fn recover_deny(rejection: Rejection) -> Result<Response, Rejection> {
    let Some(&deny) = rejection.find::<Deny>() else {
        return Err(rejection);
    };

    Ok(match deny {
        Deny::Unauthenticated => {
            warp::redirect::found(Uri::from_static("/login")).into_response()
        }
        Deny::Internal => {
            error!("request failed internally");
            let status: StatusCode = deny.into();
            status.into_response()
        }
    })
}

/// Extracts an `Authed` or rejects with `Deny` - the guard in front of
/// every protected page.
fn authenticated(
    app: Arc<Vestibule>,
) -> impl Filter<Extract = (Authed,), Error = Rejection> + Clone {
    with_app(app)
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and_then(|app: Arc<Vestibule>, token: Option<String>| async move {
            app.authenticate(token.as_deref())
                .await
                .map_err(warp::reject::custom)
        })
}

/// Like `authenticated`, for pages that render either way: resolves to
/// None instead of rejecting when the request is anonymous.
fn session_user(
    app: Arc<Vestibule>,
) -> impl Filter<Extract = (Option<Authed>,), Error = Rejection> + Clone {
    with_app(app)
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and_then(|app: Arc<Vestibule>, token: Option<String>| async move {
            match app.authenticate(token.as_deref()).await {
                Ok(authed) => Ok(Some(authed)),
                Err(Deny::Unauthenticated) => Ok(None),
                Err(deny @ Deny::Internal) => Err(warp::reject::custom(deny)),
            }
        })
}

fn flash_cookie() -> impl Filter<Extract = (Option<Flash>,), Error = Infallible> + Clone {
    warp::cookie::optional::<String>(FLASH_COOKIE)
        .map(|value: Option<String>| value.as_deref().and_then(Flash::from_cookie_value))
}

fn with_app(
    app: Arc<Vestibule>,
) -> impl Filter<Extract = (Arc<Vestibule>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&app))
}

fn with_secure(secure: bool) -> impl Filter<Extract = (bool,), Error = Infallible> + Clone {
    warp::any().map(move || secure)
}

/// Form extraction that never rejects: a missing or unparseable body
/// resolves to None, left for the handler to re-render on.
fn form_body<T>() -> impl Filter<Extract = (Option<T>,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(16 * 1024)
        .and(warp::body::form())
        .map(Some)
        .or_else(|_| async { Ok::<(Option<T>,), Rejection>((None,)) })
}

fn set_cookie(mut response: Response, cookie: String) -> Response {
    let value = header::HeaderValue::from_str(&cookie).expect("cookie header value");

    // append, not insert - a login response carries two Set-Cookies
    response.headers_mut().append(header::SET_COOKIE, value);
    response
}

/// A page render consumes the request's pending flash, whether it was
/// shown or superseded by an inline one; tell the client to drop it.
fn consume_flash(response: Response, flash: &Option<Flash>) -> Response {
    if flash.is_some() {
        set_cookie(response, flash::clear_cookie())
    } else {
        response
    }
}
