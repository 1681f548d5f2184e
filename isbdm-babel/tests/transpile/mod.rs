mod element;
mod pages;
