pub(crate) mod gnb_model;
pub(crate) mod layout;
