mod authenticate;
mod helpers;
mod lookup;
mod postgres;
mod validation;
