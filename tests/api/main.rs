mod health_check;
mod webhooks;
