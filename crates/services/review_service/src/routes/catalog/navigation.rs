use diesel_async::AsyncPgConnection;
use errors::CustomError;
use serde::Serialize;

use super::genres::genre_nav;
use super::model::NavItem;
use super::publishers::publisher_nav;

/// Menu data embedded in every page.
#[derive(Serialize, Debug)]
pub struct Navigation {
    pub genre_list: Vec<NavItem>,
    pub publisher_list: Vec<NavItem>,
}

pub async fn navigation(conn: &mut AsyncPgConnection) -> Result<Navigation, CustomError> {
    Ok(Navigation {
        genre_list: genre_nav(conn).await?,
        publisher_list: publisher_nav(conn).await?,
    })
}
