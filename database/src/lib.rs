pub mod consts {
    pub mod consts;
}

pub mod database {
    pub mod options;
    pub mod repository;
}

pub mod model {
    pub mod person;
    pub mod update;
}

pub mod persistence;
