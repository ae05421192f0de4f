pub mod starter_list_client;
