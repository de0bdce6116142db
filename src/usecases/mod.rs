use std::collections::HashMap;

use crate::entities::UserId;

/// Display names for the user references a result carries.
pub type Usernames = HashMap<UserId, String>;

macro_rules! usecase {
    ($n:ident : { $( $i:tt )* } => { $( $o:tt )* }) => {
        pub mod $n {
            #[allow(unused_imports)]
            use crate::entities;

            #[::async_trait::async_trait]
            pub trait Usecase {
                async fn handle(&self, data: Input) -> crate::error::Result<Output>;
            }

            #[derive(Debug)]
            pub struct Input { $( $i )* }

            #[derive(Debug)]
            pub struct Output { $( $o )* }
        }
    };
}

pub mod blog;
pub mod music;
pub mod user;
