mod helpers;
mod login;
mod logout;
mod pages;
mod socket;
