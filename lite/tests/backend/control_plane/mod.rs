mod stream;
mod tags;
